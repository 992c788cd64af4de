//! Core data model for TextMate grammar scanning.
//!
//! This crate provides the leaf types shared by the grammar compiler and the
//! scanning engine: hierarchical scope names, capture tables, line/column
//! positions, the offset index used to locate spans, the syntax tree returned
//! by a scan, and the scan configuration.
//!
//! # Core types
//!
//! - [`Name`] — dotted hierarchical scope identifier
//! - [`Capture`] and [`CaptureCollection`] — regex group to scope bindings
//! - [`LineCol`] and [`Location`] — zero-based line/column positions
//! - [`PositionIndex`] — byte offset to character/line/column lookup
//! - [`SyntaxNode`] and [`SyntaxTree`] — the scan output
//! - [`ScanConfig`] — regex dialect and annotation settings
//!
//! # Example
//!
//! ```
//! use tmscan_core::{Name, PositionIndex};
//!
//! let name = Name::new("keyword.control.if");
//! assert_eq!(name.segments().len(), 3);
//!
//! let index = PositionIndex::new("ab\ncd");
//! assert_eq!(index.line_col(4).map(|pos| pos.line()), Some(1));
//! ```

mod capture;
mod config;
mod name;
mod position;
mod span;
mod tree;

pub use capture::{Capture, CaptureCollection};
pub use config::ScanConfig;
pub use name::Name;
pub use position::PositionIndex;
pub use span::{LineCol, Location};
pub use tree::{AnnotationValue, Annotations, SyntaxNode, SyntaxTree};

#[cfg(test)]
mod tests;

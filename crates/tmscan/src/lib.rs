//! Tmscan: TextMate grammar compilation and scanning.
//!
//! This facade crate re-exports the data model from [`tmscan_core`] and the
//! grammar compiler from [`tmscan_grammar`], and provides the [`Engine`]
//! that scans text into a [`SyntaxTree`] of scoped spans.
//!
//! # Scanning model
//!
//! Patterns of a grammar compete for text. A `match` pattern claims every
//! occurrence of its regex, a `begin`/`end` pattern claims balanced regions
//! and scans their content with its own child patterns, and groups try their
//! members as alternatives, keeping the one that claims the most text first.
//! Overlapping results are settled by the same weight, so the output is
//! always a properly nested tree whose children are sorted by position.
//!
//! # Core types
//!
//! - [`Engine`] — compiles grammars and scans text
//! - [`Grammar`] — an immutable compiled grammar
//! - [`SyntaxTree`] and [`SyntaxNode`] — the scan output
//! - [`ScanConfig`] — regex dialect and annotation settings
//! - [`GrammarError`] — compilation failures
//!
//! # Example
//!
//! ```
//! let grammar = tmscan::compile_json(
//!     r#"{
//!         "name": "Demo",
//!         "scopeName": "source.demo",
//!         "patterns": [
//!             {"match": "(if)", "captures": {"1": {"name": "keyword.name"}}}
//!         ]
//!     }"#,
//! )
//! .expect("valid grammar");
//!
//! let tree = tmscan::scan(&grammar, "if x");
//! let keyword = tree.root().find_scope("keyword.name").expect("keyword span");
//! assert_eq!(keyword.range(), 0..2);
//! ```

mod assembler;
mod engine;
mod regex;
mod scanner;

pub use tmscan_core::{
    AnnotationValue, Annotations, Capture, CaptureCollection, LineCol, Location, Name,
    PositionIndex, ScanConfig, SyntaxNode, SyntaxTree,
};
pub use tmscan_grammar::{
    Grammar, GrammarDocument, GrammarError, Include, Matched, Pattern, PatternFunctionality,
    PatternId, RawCaptures, RawRule, Wrapped,
};

pub use engine::{Engine, compile, compile_json, scan};

#[cfg(test)]
mod tests;

//! TextMate grammar decoding and compilation.
//!
//! A grammar document (the JSON form of a `.tmLanguage` file) is decoded
//! into [`GrammarDocument`] and compiled into an immutable [`Grammar`]: an
//! arena of [`Pattern`] nodes addressed by [`PatternId`] handles. Includes
//! (`#name`, `$self`, `$base`) become handle lookups, so repository entries
//! may include themselves directly or through other entries.
//!
//! # Example
//!
//! ```
//! use tmscan_grammar::{compile_json, PatternFunctionality};
//!
//! let grammar = compile_json(r##"{
//!     "name": "Demo",
//!     "scopeName": "source.demo",
//!     "patterns": [{ "include": "#word" }],
//!     "repository": {
//!         "word": { "match": "\\w+", "name": "variable.demo" }
//!     }
//! }"##)?;
//!
//! let top = grammar.patterns()[0];
//! let pattern = grammar.pattern(top).expect("pattern in arena");
//! assert!(matches!(pattern.functionality(), PatternFunctionality::Match(_)));
//! # Ok::<(), tmscan_grammar::GrammarError>(())
//! ```

mod compiler;
mod document;
mod error;
mod graph;

pub use compiler::{compile, compile_json};
pub use document::{GrammarDocument, Include, RawCaptures, RawRule};
pub use error::GrammarError;
pub use graph::{Grammar, Matched, Pattern, PatternFunctionality, PatternId, Wrapped};

#[cfg(test)]
mod tests;

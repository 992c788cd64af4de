//! The scanning entrypoint.
//!
//! An [`Engine`] holds a [`ScanConfig`] and turns text into a
//! [`SyntaxTree`] using a compiled [`Grammar`]. Each call to
//! [`Engine::scan`] owns its regex cache and frame stack, so one grammar and
//! one engine can serve any number of scans.

use tmscan_core::{Location, PositionIndex, ScanConfig, SyntaxNode, SyntaxTree};
use tmscan_grammar::{Grammar, GrammarDocument, GrammarError};
use tracing::debug;

use crate::assembler::RawSpan;
use crate::scanner::{SCANNER_TARGET, Scanner};

/// Compiles grammars and scans text with them.
///
/// # Example
///
/// ```
/// use tmscan::{Engine, ScanConfig};
///
/// let engine = Engine::new(ScanConfig::default());
/// let grammar = engine
///     .compile_json(r#"{"name": "Demo", "scopeName": "source.demo", "patterns": []}"#)
///     .expect("valid grammar");
/// let tree = engine.scan(&grammar, "text");
/// assert_eq!(tree.root().range(), 0..4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: ScanConfig,
}

impl Engine {
    /// Creates a new engine with the given configuration.
    #[must_use]
    pub const fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Compiles a decoded grammar document.
    ///
    /// # Errors
    ///
    /// Returns a [`GrammarError`] if an include cannot be resolved or a rule
    /// is structurally invalid.
    #[expect(
        clippy::unused_self,
        reason = "compilation is configuration-independent but kept on the engine for a uniform API"
    )]
    pub fn compile(&self, document: &GrammarDocument) -> Result<Grammar, GrammarError> {
        tmscan_grammar::compile(document)
    }

    /// Decodes and compiles a JSON grammar document.
    ///
    /// # Errors
    ///
    /// Returns a [`GrammarError`] if the JSON is malformed or compilation
    /// fails.
    #[expect(
        clippy::unused_self,
        reason = "compilation is configuration-independent but kept on the engine for a uniform API"
    )]
    pub fn compile_json(&self, json: &str) -> Result<Grammar, GrammarError> {
        tmscan_grammar::compile_json(json)
    }

    /// Scans `text` and returns its syntax tree.
    ///
    /// The root node spans the whole text, carries the grammar's root scope
    /// and is annotated with `scopeName` and `language`. Scanning never
    /// fails: regexes that cannot be compiled degrade as configured.
    #[must_use]
    pub fn scan(&self, grammar: &Grammar, text: &str) -> SyntaxTree {
        debug!(
            target: SCANNER_TARGET,
            grammar = grammar.name(),
            bytes = text.len(),
            "scan started"
        );
        let root = Scanner::new(grammar, text, &self.config).run();
        let index = PositionIndex::new(text);
        let tree = SyntaxTree::new(to_node(root, &index));
        debug!(
            target: SCANNER_TARGET,
            grammar = grammar.name(),
            nodes = tree.root().iter().count(),
            "scan finished"
        );
        tree
    }
}

/// Converts byte offsets to character offsets and line/column positions.
fn to_node(span: RawSpan, index: &PositionIndex) -> SyntaxNode {
    let start = span.range.start;
    let end = span.range.end;
    let location = Location::new(
        index.line_col(start).unwrap_or_default(),
        index.line_col(end).unwrap_or_default(),
    );
    SyntaxNode {
        scope: span.scope,
        range: index.char_offset(start).unwrap_or_default()
            ..index.char_offset(end).unwrap_or_default(),
        location,
        annotations: span.annotations,
        children: span
            .children
            .into_iter()
            .map(|child| to_node(child, index))
            .collect(),
    }
}

/// Compiles a decoded grammar document.
///
/// # Errors
///
/// See [`Engine::compile`].
pub fn compile(document: &GrammarDocument) -> Result<Grammar, GrammarError> {
    tmscan_grammar::compile(document)
}

/// Decodes and compiles a JSON grammar document.
///
/// # Errors
///
/// See [`Engine::compile_json`].
pub fn compile_json(json: &str) -> Result<Grammar, GrammarError> {
    tmscan_grammar::compile_json(json)
}

/// Scans `text` with the default [`ScanConfig`].
#[must_use]
pub fn scan(grammar: &Grammar, text: &str) -> SyntaxTree {
    Engine::default().scan(grammar, text)
}

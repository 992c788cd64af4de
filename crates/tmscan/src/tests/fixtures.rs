//! Grammar documents shared by the engine tests.

use crate::{Grammar, compile_json};

/// Balanced parentheses whose content may contain further parentheses.
pub(super) const PARENS: &str = r##"{
    "name": "Parens",
    "scopeName": "source.parens",
    "patterns": [{"include": "#paren"}],
    "repository": {
        "paren": {
            "name": "meta.paren",
            "begin": "\\(",
            "end": "\\)",
            "patterns": [{"include": "$self"}]
        }
    }
}"##;

/// A single keyword with a named capture group.
pub(super) const KEYWORDS: &str = r#"{
    "name": "Keywords",
    "scopeName": "source.kw",
    "patterns": [
        {"match": "(if)", "captures": {"1": {"name": "keyword.name"}}}
    ]
}"#;

/// Double-quoted strings with delimiter captures and a content scope.
pub(super) const STRINGS: &str = r#"{
    "name": "Strings",
    "scopeName": "source.str",
    "patterns": [{
        "name": "string.quoted",
        "begin": "\"",
        "end": "\"",
        "contentName": "string.body",
        "beginCaptures": {"0": {"name": "punctuation.begin"}},
        "endCaptures": {"0": {"name": "punctuation.end"}}
    }]
}"#;

/// Builds a grammar whose only content is the given top-level rules.
pub(super) fn grammar_of(patterns: &str) -> Grammar {
    let json = format!(
        r#"{{"name": "Test", "scopeName": "source.test", "patterns": {patterns}}}"#
    );
    compile_json(&json).expect("test grammar compiles")
}

pub(super) fn grammar(json: &str) -> Grammar {
    compile_json(json).expect("fixture grammar compiles")
}

//! Tests for the grammar document mapping.

use rstest::rstest;
use serde_json::json;

use crate::{GrammarDocument, GrammarError, Include, RawCaptures};

#[rstest]
#[case("#string", Include::Repository(String::from("string")))]
#[case("$self", Include::Grammar)]
#[case("$base", Include::Grammar)]
fn include_strings_parse(#[case] raw: &str, #[case] expected: Include) {
    assert_eq!(Include::parse(raw).expect("valid include"), expected);
}

#[rstest]
#[case("source.js")]
#[case("string")]
#[case("")]
fn unsupported_includes_are_rejected(#[case] raw: &str) {
    let err = Include::parse(raw).expect_err("include should be rejected");
    assert!(matches!(err, GrammarError::InvalidInclude { .. }));
}

#[test]
fn captures_accept_objects_and_bare_strings() {
    let raw: RawCaptures = serde_json::from_value(json!({
        "1": { "name": "keyword.name" },
        "2": "entity.name",
        "3": { "patterns": [] },
        "x": { "name": "ignored" }
    }))
    .expect("decode captures");

    let collection = raw.to_collection();
    let names: Vec<(usize, String)> = collection
        .iter()
        .map(|capture| (capture.index(), capture.name().to_string()))
        .collect();
    assert_eq!(
        names,
        vec![
            (1, String::from("keyword.name")),
            (2, String::from("entity.name")),
            (3, String::from("3")),
        ]
    );
}

#[test]
fn document_requires_scope_name() {
    let err = GrammarDocument::from_json(r#"{ "name": "X", "patterns": [] }"#)
        .expect_err("missing scopeName");
    assert!(matches!(err, GrammarError::Decode(_)));
}

#[test]
fn document_defaults_optional_fields() {
    let document =
        GrammarDocument::from_json(r#"{ "name": "X", "scopeName": "source.x", "patterns": [] }"#)
            .expect("decode");
    assert!(document.uuid.is_none());
    assert!(document.repository.is_empty());
    assert_eq!(document.scope_name, "source.x");
}

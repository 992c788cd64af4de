//! Tests for begin/end region pairing.

use rstest::rstest;

use super::fixtures::{PARENS, STRINGS, grammar};
use crate::{SyntaxNode, scan};

fn texts_of<'s>(root: &SyntaxNode, scope: &str, source: &'s str) -> Vec<&'s str> {
    root.iter()
        .filter(|node| node.scope().is_some_and(|name| name.to_string() == scope))
        .map(|node| node.text(source))
        .collect()
}

#[test]
fn nested_regions_pair_balanced_delimiters() {
    let source = "A( B( C) )";
    let tree = scan(&grammar(PARENS), source);
    assert_eq!(
        texts_of(tree.root(), "meta.paren", source),
        vec!["( B( C) )", "( C)"]
    );
}

#[test]
fn nested_regions_form_an_outline() {
    let tree = scan(&grammar(PARENS), "A( B( C) )");
    assert_eq!(
        tree.outline(),
        concat!(
            "source.parens 0..10 language=\"Parens\" scopeName=\"source.parens\"\n",
            "  meta.paren 1..10\n",
            "    meta.paren.content 2..9\n",
            "      meta.paren 4..8\n",
            "        meta.paren.content 5..7\n",
        )
    );
}

#[rstest]
#[case::separated("(a) (b)", vec!["(a)", "(b)"])]
#[case::adjacent("(a)(b)", vec!["(a)", "(b)"])]
#[case::unclosed_outer("( ( )", vec!["( )"])]
#[case::unopened_end("(a))", vec!["(a)"])]
#[case::no_end("((", vec![])]
fn regions_pair_with_the_right_end(#[case] source: &str, #[case] expected: Vec<&str>) {
    let tree = scan(&grammar(PARENS), source);
    assert_eq!(texts_of(tree.root(), "meta.paren", source), expected);
}

#[test]
fn content_scope_defaults_to_a_child_of_the_rule_name() {
    let source = "(a)";
    let tree = scan(&grammar(PARENS), source);
    let content = tree
        .root()
        .find_scope("meta.paren.content")
        .expect("content span");
    assert_eq!(content.text(source), "a");
}

#[test]
fn delimiter_captures_and_content_name_are_applied() {
    let tree = scan(&grammar(STRINGS), r#"say "hi" now"#);
    assert_eq!(
        tree.outline(),
        concat!(
            "source.str 0..12 language=\"Strings\" scopeName=\"source.str\"\n",
            "  string.quoted 4..8\n",
            "    punctuation.begin 4..5 value=\"\\\"\"\n",
            "    string.body 5..7\n",
            "    punctuation.end 7..8 value=\"\\\"\"\n",
        )
    );
}

#[test]
fn a_closing_delimiter_may_open_the_next_region() {
    let source = r#""a" "b""#;
    let tree = scan(&grammar(STRINGS), source);
    assert_eq!(
        texts_of(tree.root(), "string.quoted", source),
        vec![r#""a""#, r#""b""#]
    );
}

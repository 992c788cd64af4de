//! Behaviour-driven tests for the `tmscan` engine.

use std::str::FromStr;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use super::fixtures::{KEYWORDS, PARENS, STRINGS};
use crate::{AnnotationValue, Engine, Grammar, GrammarError, ScanConfig, SyntaxTree};

// ---------------------------------------------------------------------------
// Typed wrappers for Gherkin step parameters
// ---------------------------------------------------------------------------

/// A quoted string value from a Gherkin feature file.
#[derive(Debug, Clone, PartialEq, Eq)]
struct QuotedString(String);

impl FromStr for QuotedString {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim_matches('"').to_owned()))
    }
}

impl QuotedString {
    fn as_str(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Test world
// ---------------------------------------------------------------------------

struct TestWorld {
    engine: Engine,
    grammar: Option<Result<Grammar, GrammarError>>,
    source: String,
    tree: Option<SyntaxTree>,
}

#[fixture]
fn world() -> TestWorld {
    TestWorld {
        engine: Engine::new(ScanConfig::default()),
        grammar: None,
        source: String::new(),
        tree: None,
    }
}

impl TestWorld {
    fn grammar(&self) -> &Grammar {
        self.grammar
            .as_ref()
            .expect("grammar should be set")
            .as_ref()
            .expect("grammar should compile")
    }

    fn tree(&self) -> &SyntaxTree {
        self.tree.as_ref().expect("text should be scanned")
    }
}

// ---------------------------------------------------------------------------
// Given steps
// ---------------------------------------------------------------------------

#[given("the {name} grammar")]
fn given_grammar(world: &mut TestWorld, name: QuotedString) {
    let json = match name.as_str() {
        "parens" => PARENS,
        "keywords" => KEYWORDS,
        "strings" => STRINGS,
        other => panic!("unknown fixture grammar: {other}"),
    };
    world.grammar = Some(world.engine.compile_json(json));
}

#[given("a grammar including {include}")]
fn given_grammar_including(world: &mut TestWorld, include: QuotedString) {
    let json = format!(
        r#"{{"name": "X", "scopeName": "source.x", "patterns": [{{"include": "{}"}}]}}"#,
        include.as_str()
    );
    world.grammar = Some(world.engine.compile_json(&json));
}

// ---------------------------------------------------------------------------
// When steps
// ---------------------------------------------------------------------------

#[when("the text {text} is scanned")]
fn when_scanned(world: &mut TestWorld, text: QuotedString) {
    let tree = world.engine.scan(world.grammar(), text.as_str());
    world.source = text.as_str().to_owned();
    world.tree = Some(tree);
}

// ---------------------------------------------------------------------------
// Then steps
// ---------------------------------------------------------------------------

#[then("a {scope} span covers {text}")]
fn then_span_covers(world: &mut TestWorld, scope: QuotedString, text: QuotedString) {
    let source = world.source.as_str();
    let found = world.tree().root().iter().any(|node| {
        node.scope()
            .is_some_and(|name| name.to_string() == scope.as_str())
            && node.text(source) == text.as_str()
    });
    assert!(found, "no {} span covers {:?}", scope.as_str(), text.as_str());
}

#[then("the {scope} span has value {value}")]
fn then_span_value(world: &mut TestWorld, scope: QuotedString, value: QuotedString) {
    let node = world
        .tree()
        .root()
        .find_scope(scope.as_str())
        .expect("scoped span should exist");
    assert_eq!(
        node.annotation("value").and_then(AnnotationValue::as_str),
        Some(value.as_str())
    );
}

#[then("the root has {count} children")]
fn then_root_children(world: &mut TestWorld, count: usize) {
    assert_eq!(world.tree().root().children().len(), count);
}

#[then("compilation fails with {message}")]
fn then_compilation_fails(world: &mut TestWorld, message: QuotedString) {
    let result = world.grammar.as_ref().expect("grammar should be set");
    let error = result.as_ref().expect_err("expected compilation failure");
    assert_eq!(error.to_string(), message.as_str());
}

// ---------------------------------------------------------------------------
// Scenario registration
// ---------------------------------------------------------------------------

#[scenario(
    path = "tests/features/tmscan.feature",
    name = "Nested regions pair balanced delimiters"
)]
fn nested_regions_behaviour(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/tmscan.feature",
    name = "Captures carry their matched text"
)]
fn captures_behaviour(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/tmscan.feature",
    name = "Empty text yields an empty root"
)]
fn empty_text_behaviour(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/tmscan.feature",
    name = "Missing includes fail compilation"
)]
fn missing_include_behaviour(world: TestWorld) {
    let _ = world;
}

//! Structural mapping of the TextMate grammar document.
//!
//! These types mirror the JSON field layout one-to-one and carry no resolved
//! references. [`compile`](crate::compile) turns them into a
//! [`Grammar`](crate::Grammar).

use std::collections::BTreeMap;

use serde::Deserialize;
use tmscan_core::{Capture, CaptureCollection, Name};

use crate::error::GrammarError;

/// A decoded grammar document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarDocument {
    /// Stable identifier of the grammar.
    #[serde(default)]
    pub uuid: Option<String>,
    /// Display name of the language.
    pub name: String,
    /// Root scope name, e.g. `source.json`.
    pub scope_name: String,
    /// Named reusable rules.
    #[serde(default)]
    pub repository: BTreeMap<String, RawRule>,
    /// Ordered top-level rules.
    pub patterns: Vec<RawRule>,
}

impl GrammarDocument {
    /// Decodes a grammar document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::Decode`] if the text is not valid JSON or a
    /// field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self, GrammarError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// One rule as written in the document, before classification.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRule {
    /// `#name`, `$self` or `$base`.
    #[serde(default)]
    pub include: Option<String>,
    /// Scope name applied to spans produced by the rule.
    #[serde(default)]
    pub name: Option<String>,
    /// Single-shot regex.
    #[serde(default, rename = "match")]
    pub match_regex: Option<String>,
    /// Opening delimiter regex.
    #[serde(default)]
    pub begin: Option<String>,
    /// Closing delimiter regex.
    #[serde(default)]
    pub end: Option<String>,
    /// Captures for `match`, or for both delimiters of a begin/end rule.
    #[serde(default)]
    pub captures: Option<RawCaptures>,
    /// Captures for the opening delimiter.
    #[serde(default)]
    pub begin_captures: Option<RawCaptures>,
    /// Captures for the closing delimiter.
    #[serde(default)]
    pub end_captures: Option<RawCaptures>,
    /// Scope name for the text between the delimiters.
    #[serde(default)]
    pub content_name: Option<String>,
    /// Nested rules.
    #[serde(default)]
    pub patterns: Option<Vec<Self>>,
    /// Rule-local repository, shadowing outer entries of the same name.
    #[serde(default)]
    pub repository: BTreeMap<String, Self>,
}

/// The body a [`RawRule`] describes once its fields are classified.
#[derive(Debug, Clone, Copy)]
pub(crate) enum RuleBody<'d> {
    Include(&'d str),
    Match(&'d str),
    Wrapped { begin: &'d str, end: &'d str },
    Group(&'d [RawRule]),
}

impl RawRule {
    pub(crate) fn body(&self) -> Result<RuleBody<'_>, GrammarError> {
        if let Some(include) = &self.include {
            return Ok(RuleBody::Include(include));
        }
        if let Some(regex) = &self.match_regex {
            return Ok(RuleBody::Match(regex));
        }
        match (&self.begin, &self.end) {
            (Some(begin), Some(end)) => return Ok(RuleBody::Wrapped { begin, end }),
            (Some(begin), None) => {
                return Err(GrammarError::schema(format!(
                    "begin pattern {begin:?} has no end pattern"
                )));
            }
            (None, Some(end)) => {
                return Err(GrammarError::schema(format!(
                    "end pattern {end:?} has no begin pattern"
                )));
            }
            (None, None) => {}
        }
        self.patterns.as_deref().map(RuleBody::Group).ok_or_else(|| {
            GrammarError::schema("rule has none of include, match, begin/end or patterns")
        })
    }

    pub(crate) fn scope_name(&self) -> Option<Name> {
        self.name.as_deref().map(Name::new)
    }
}

/// Target of an `include` rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Include {
    /// `#name`: a repository entry visible from the including rule.
    Repository(String),
    /// `$self` or `$base`: the owning grammar's top-level rules.
    Grammar,
}

impl Include {
    /// Parses an include string.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::InvalidInclude`] for anything other than
    /// `#name`, `$self` or `$base`.
    pub fn parse(include: &str) -> Result<Self, GrammarError> {
        if let Some(name) = include.strip_prefix('#') {
            return Ok(Self::Repository(name.to_owned()));
        }
        match include {
            "$self" | "$base" => Ok(Self::Grammar),
            other => Err(GrammarError::invalid_include(other)),
        }
    }
}

/// Capture table as written: decimal group index to capture description.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct RawCaptures(BTreeMap<String, serde_json::Value>);

impl RawCaptures {
    /// Converts to a [`CaptureCollection`].
    ///
    /// Non-numeric keys are ignored. A value may be `{"name": ...}` or a bare
    /// scope string; anything else is named after the group index.
    #[must_use]
    pub fn to_collection(&self) -> CaptureCollection {
        self.0
            .iter()
            .filter_map(|(key, value)| {
                let index: usize = key.parse().ok()?;
                let name = match value {
                    serde_json::Value::String(scope) => Name::new(scope),
                    serde_json::Value::Object(fields) => fields
                        .get("name")
                        .and_then(serde_json::Value::as_str)
                        .map_or_else(|| Name::new(key), Name::new),
                    _ => Name::new(key),
                };
                Some(Capture::new(index, name))
            })
            .collect()
    }
}

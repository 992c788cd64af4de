//! Syntax tree produced by a scan.
//!
//! Each [`SyntaxNode`] carries an optional scope [`Name`], a half-open
//! character range, the matching line/column [`Location`], string-keyed
//! annotations, and its ordered children. Children never overlap and are
//! sorted by start offset; every child range lies within its parent's range.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::name::Name;
use crate::span::Location;

/// A primitive annotation value attached to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnnotationValue {
    /// Textual value, such as the literal text of a capture.
    String(String),
    /// Integral value.
    Integer(i64),
    /// Boolean flag.
    Boolean(bool),
}

impl AnnotationValue {
    /// Returns the value as a string slice when it is textual.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            Self::Integer(_) | Self::Boolean(_) => None,
        }
    }
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) => write!(f, "{value:?}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Boolean(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for AnnotationValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for AnnotationValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Annotation map keyed by annotation name, iterated in key order.
pub type Annotations = BTreeMap<String, AnnotationValue>;

/// One node of the scanned syntax tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxNode {
    /// Scope name assigned by the grammar, if any.
    pub scope: Option<Name>,
    /// Half-open character offset range.
    pub range: Range<usize>,
    /// Half-open line/column interval of `range`.
    pub location: Location,
    /// Annotations such as captured text.
    pub annotations: Annotations,
    /// Ordered, non-overlapping children.
    pub children: Vec<Self>,
}

impl SyntaxNode {
    /// Returns the scope name, if any.
    #[must_use]
    pub const fn scope(&self) -> Option<&Name> {
        self.scope.as_ref()
    }

    /// Returns the character range.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Returns the line/column location.
    #[must_use]
    pub const fn location(&self) -> Location {
        self.location
    }

    /// Returns the annotation stored under `key`.
    #[must_use]
    pub fn annotation(&self, key: &str) -> Option<&AnnotationValue> {
        self.annotations.get(key)
    }

    /// Returns the children in source order.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Returns the slice of `source` covered by this node.
    ///
    /// `source` must be the text that was scanned. Returns an empty string
    /// when the range does not fit the given text.
    #[must_use]
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        let mut boundaries = source
            .char_indices()
            .map(|(offset, _)| offset)
            .chain(std::iter::once(source.len()));
        let Some(start) = boundaries.nth(self.range.start) else {
            return "";
        };
        let Some(end) = std::iter::once(start)
            .chain(boundaries)
            .nth(self.range.len())
        else {
            return "";
        };
        source.get(start..end).unwrap_or_default()
    }

    /// Iterates this node and all descendants in depth-first pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &Self> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// Returns the first node in pre-order whose scope equals `scope`.
    #[must_use]
    pub fn find_scope(&self, scope: &str) -> Option<&Self> {
        let wanted = Name::new(scope);
        self.iter().find(|node| node.scope.as_ref() == Some(&wanted))
    }
}

/// The result of scanning one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxTree {
    root: SyntaxNode,
}

impl SyntaxTree {
    /// Wraps the root document node.
    #[must_use]
    pub const fn new(root: SyntaxNode) -> Self {
        Self { root }
    }

    /// Returns the root document node.
    #[must_use]
    pub const fn root(&self) -> &SyntaxNode {
        &self.root
    }

    /// Consumes the tree and returns its root node.
    #[must_use]
    pub fn into_root(self) -> SyntaxNode {
        self.root
    }

    /// Renders an indented outline of scopes, ranges and annotations.
    ///
    /// Intended for diagnostics and snapshot tests; one line per node.
    #[must_use]
    pub fn outline(&self) -> String {
        let mut out = String::new();
        write_outline(&self.root, 0, &mut out);
        out
    }
}

fn write_outline(node: &SyntaxNode, depth: usize, out: &mut String) {
    let scope = node
        .scope
        .as_ref()
        .map_or_else(|| String::from("<none>"), ToString::to_string);
    out.push_str(&format!(
        "{:indent$}{scope} {}..{}",
        "",
        node.range.start,
        node.range.end,
        indent = depth * 2
    ));
    for (key, value) in &node.annotations {
        out.push_str(&format!(" {key}={value}"));
    }
    out.push('\n');
    for child in &node.children {
        write_outline(child, depth + 1, out);
    }
}

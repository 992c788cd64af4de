//! The compiled pattern graph.
//!
//! Patterns live in an arena owned by [`Grammar`] and refer to each other
//! through [`PatternId`] handles. Includes, parent links and `$self`
//! references are plain lookups into that arena, so repository entries that
//! include themselves (directly or through other entries) need no special
//! ownership handling.

use tmscan_core::{CaptureCollection, Name};

/// Stable handle of a [`Pattern`] inside its [`Grammar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatternId(u32);

impl PatternId {
    pub(crate) fn from_index(index: usize) -> Self {
        // Grammars never approach u32::MAX patterns.
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }

    /// Returns the arena slot of this handle.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single-shot regex rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matched {
    /// The regex source text.
    pub regex: String,
    /// Scopes for individual groups.
    pub captures: Option<CaptureCollection>,
}

/// A begin/end delimited region rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wrapped {
    /// Opening delimiter regex.
    pub begin: String,
    /// Scopes for groups of the opening delimiter.
    pub begin_captures: Option<CaptureCollection>,
    /// Closing delimiter regex.
    pub end: String,
    /// Scopes for groups of the closing delimiter.
    pub end_captures: Option<CaptureCollection>,
    /// Scope of the text between the delimiters.
    pub content_name: Option<Name>,
    /// Rules applied to the text between the delimiters.
    pub children: Vec<PatternId>,
}

/// What a pattern does when visited. The variant set is fixed by the
/// grammar format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternFunctionality {
    /// Match a regex repeatedly across the window.
    Match(Matched),
    /// Pair begin and end delimiters and scan between them.
    Wrapped(Wrapped),
    /// Unnamed alternation of sub-patterns.
    Group(Vec<PatternId>),
    /// Re-enter the owning grammar's top-level patterns.
    GrammarRef,
}

/// One node of the pattern graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub(crate) name: Option<Name>,
    pub(crate) functionality: PatternFunctionality,
    pub(crate) parent: Option<PatternId>,
}

impl Pattern {
    /// Returns the scope name applied to spans of this pattern.
    #[must_use]
    pub const fn name(&self) -> Option<&Name> {
        self.name.as_ref()
    }

    /// Returns the pattern's behaviour.
    #[must_use]
    pub const fn functionality(&self) -> &PatternFunctionality {
        &self.functionality
    }

    /// Returns the pattern this one was declared inside, for diagnostics.
    ///
    /// Shared repository entries have no parent.
    #[must_use]
    pub const fn parent(&self) -> Option<PatternId> {
        self.parent
    }
}

/// A compiled, immutable grammar.
///
/// A grammar can be shared freely between concurrent scans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    pub(crate) uuid: Option<String>,
    pub(crate) name: String,
    pub(crate) scope_name: Name,
    pub(crate) patterns: Vec<PatternId>,
    pub(crate) arena: Vec<Pattern>,
}

impl Grammar {
    /// Returns the grammar's stable identifier, if declared.
    #[must_use]
    pub fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }

    /// Returns the language display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the root scope name.
    #[must_use]
    pub const fn scope_name(&self) -> &Name {
        &self.scope_name
    }

    /// Returns the ordered top-level patterns.
    #[must_use]
    pub fn patterns(&self) -> &[PatternId] {
        &self.patterns
    }

    /// Looks up a pattern by handle.
    #[must_use]
    pub fn pattern(&self, id: PatternId) -> Option<&Pattern> {
        self.arena.get(id.index())
    }

    /// Returns the number of patterns in the arena.
    #[must_use]
    pub fn pattern_count(&self) -> usize {
        self.arena.len()
    }
}

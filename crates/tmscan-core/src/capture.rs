//! Capture tables binding regex groups to scope names.
//!
//! A grammar rule may name individual groups of its regex. When a group
//! participates in a match, the scanner emits a nested span scoped with the
//! bound [`Name`]. Collections iterate in ascending group order so that
//! annotation is deterministic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::name::Name;

/// Associates one regex group index with a scope name.
///
/// # Example
///
/// ```
/// use tmscan_core::{Capture, Name};
///
/// let capture = Capture::new(1, Name::new("keyword.name"));
/// assert_eq!(capture.index(), 1);
/// assert_eq!(capture.name().to_string(), "keyword.name");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capture {
    index: usize,
    name: Name,
}

impl Capture {
    /// Creates a capture for group `index`.
    #[must_use]
    pub const fn new(index: usize, name: Name) -> Self {
        Self { index, name }
    }

    /// Returns the regex group index.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns the scope name applied to the group.
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.name
    }
}

/// Ordered mapping from group index to [`Capture`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureCollection {
    captures: BTreeMap<usize, Capture>,
}

impl CaptureCollection {
    /// Creates an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            captures: BTreeMap::new(),
        }
    }

    /// Adds or replaces the capture for its group index.
    pub fn insert(&mut self, capture: Capture) {
        self.captures.insert(capture.index(), capture);
    }

    /// Returns the capture bound to `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Capture> {
        self.captures.get(&index)
    }

    /// Iterates captures in ascending group order.
    pub fn iter(&self) -> impl Iterator<Item = &Capture> {
        self.captures.values()
    }

    /// Returns the number of bound groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.captures.len()
    }

    /// Returns whether no groups are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.captures.is_empty()
    }
}

impl FromIterator<Capture> for CaptureCollection {
    fn from_iter<T: IntoIterator<Item = Capture>>(iter: T) -> Self {
        let mut collection = Self::new();
        for capture in iter {
            collection.insert(capture);
        }
        collection
    }
}

impl<'a> IntoIterator for &'a CaptureCollection {
    type Item = &'a Capture;
    type IntoIter = std::collections::btree_map::Values<'a, usize, Capture>;

    fn into_iter(self) -> Self::IntoIter {
        self.captures.values()
    }
}

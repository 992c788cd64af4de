//! Weighted conflict resolution for candidate spans.
//!
//! Candidates arrive in production order and may overlap. Each overlap is
//! settled by weight: the number of bytes a span actually claims for a scope.
//! The heavier side wins and the lighter side is nested inside it when it
//! fits, otherwise dropped. The surviving spans are disjoint, properly nested
//! and sorted by start.

use std::collections::BTreeMap;
use std::ops::Range;

use tmscan_core::{Annotations, Name};

/// A span under construction, with byte offsets into the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawSpan {
    pub(crate) scope: Option<Name>,
    pub(crate) range: Range<usize>,
    pub(crate) annotations: Annotations,
    pub(crate) children: Vec<Self>,
}

impl RawSpan {
    /// Bytes of text claimed by this span and its descendants.
    ///
    /// Spans scoped `invalid.*` claim nothing, so any real scope beats them.
    pub(crate) fn weight(&self) -> usize {
        if self.scope.as_ref().is_some_and(Name::is_invalid) {
            return 0;
        }
        if self.children.is_empty() {
            return self.range.len();
        }
        self.children.iter().map(Self::weight).sum()
    }

    fn is_bare(&self) -> bool {
        self.scope.is_none() && self.annotations.is_empty()
    }

    const fn contains(&self, other: &Range<usize>) -> bool {
        self.range.start <= other.start && other.end <= self.range.end
    }

    /// Nests `other` somewhere inside this span.
    ///
    /// Hands `other` back when it does not fit: it is not contained in this
    /// span or it straddles one of the existing children. A bare `other` is
    /// merged child by child, and only the children that did not fit come
    /// back, still wrapped in the bare span.
    pub(crate) fn try_insert(&mut self, other: Self) -> Result<(), Self> {
        if !self.contains(&other.range) {
            return Err(other);
        }

        if other.is_bare() {
            let rejected: Vec<Self> = other
                .children
                .into_iter()
                .filter_map(|child| self.try_insert(child).err())
                .collect();
            if rejected.is_empty() {
                return Ok(());
            }
            return Err(Self {
                children: rejected,
                ..other
            });
        }

        if self.scope.is_none() && self.range == other.range {
            self.scope = other.scope;
            self.annotations.extend(other.annotations);
            for child in other.children {
                // Children that straddle ours are dropped.
                let _dropped = self.try_insert(child);
            }
            return Ok(());
        }

        match self.slot_for(&other.range) {
            Some(Slot::Before(index)) => {
                self.children.insert(index, other);
                Ok(())
            }
            Some(Slot::Inside(index)) => match self.children.get_mut(index) {
                Some(child) => child.try_insert(other),
                None => Err(other),
            },
            Some(Slot::Last) => {
                self.children.push(other);
                Ok(())
            }
            None => Err(other),
        }
    }

    /// Finds where a contained range fits among the sorted children.
    fn slot_for(&self, range: &Range<usize>) -> Option<Slot> {
        let mut gap_start = self.range.start;
        for (index, child) in self.children.iter().enumerate() {
            if gap_start <= range.start && range.end <= child.range.start {
                return Some(Slot::Before(index));
            }
            if child.contains(range) {
                return Some(Slot::Inside(index));
            }
            gap_start = child.range.end;
        }
        (gap_start <= range.start).then_some(Slot::Last)
    }
}

enum Slot {
    Before(usize),
    Inside(usize),
    Last,
}

/// Resolves overlapping candidates into a disjoint, sorted forest.
///
/// Accepted spans are disjoint and keyed by start, so the spans a candidate
/// overlaps are found with one range query.
pub(crate) fn assemble(candidates: Vec<RawSpan>) -> Vec<RawSpan> {
    let mut accepted: BTreeMap<usize, RawSpan> = BTreeMap::new();

    for candidate in candidates {
        if candidate.range.is_empty() {
            continue;
        }
        let conflicts = take_overlapping(&mut accepted, &candidate.range);

        if conflicts.is_empty() {
            accepted.insert(candidate.range.start, candidate);
            continue;
        }

        let conflict_weight: usize = conflicts.iter().map(RawSpan::weight).sum();
        if candidate.weight() > conflict_weight {
            let mut winner = candidate;
            for conflict in conflicts {
                // Losers that straddle the winner's children are dropped.
                let _dropped = winner.try_insert(conflict);
            }
            accepted.insert(winner.range.start, winner);
        } else {
            let mut pending = Some(candidate);
            for mut conflict in conflicts {
                if let Some(candidate) = pending.take() {
                    pending = conflict.try_insert(candidate).err();
                }
                accepted.insert(conflict.range.start, conflict);
            }
        }
    }

    accepted.into_values().filter_map(tidy).collect()
}

/// Removes and returns the accepted spans overlapping `range`, by start.
fn take_overlapping(
    accepted: &mut BTreeMap<usize, RawSpan>,
    range: &Range<usize>,
) -> Vec<RawSpan> {
    let straddling = accepted
        .range(..range.start)
        .next_back()
        .filter(|(_, span)| span.range.end > range.start)
        .map(|(start, _)| *start);
    let starts: Vec<usize> = straddling
        .into_iter()
        .chain(accepted.range(range.clone()).map(|(start, _)| *start))
        .collect();
    starts
        .into_iter()
        .filter_map(|start| accepted.remove(&start))
        .collect()
}

/// Drops spans that carry nothing and unwraps bare single-child wrappers.
fn tidy(span: RawSpan) -> Option<RawSpan> {
    if span.range.is_empty() {
        return None;
    }
    if !span.is_bare() {
        return Some(span);
    }
    let mut children = span.children;
    match children.len() {
        0 => None,
        1 => children.pop(),
        _ => Some(RawSpan { children, ..span }),
    }
}

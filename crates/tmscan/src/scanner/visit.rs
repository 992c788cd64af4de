//! Pattern visits: how each kind of pattern turns text into spans.

use std::ops::Range;

use tmscan_core::{CaptureCollection, Name};
use tmscan_grammar::{Matched, PatternFunctionality, PatternId, Wrapped};
use tracing::warn;

use super::{Owner, SCANNER_TARGET, Scanner};
use crate::assembler::RawSpan;
use crate::regex::RegexMatch;

/// How far an end delimiter search may reach.
#[derive(Debug, Clone, Copy)]
enum Horizon {
    /// Up to the end of the begin match at this index.
    Begin(usize),
    /// Up to the end of the window.
    WindowEnd,
}

impl Horizon {
    const fn after(current: usize, begins: usize) -> Self {
        if current + 1 < begins {
            Self::Begin(current + 1)
        } else {
            Self::WindowEnd
        }
    }
}

impl Scanner<'_> {
    /// Applies one pattern to the free parts of the current window.
    pub(super) fn visit(&mut self, id: PatternId) {
        if self.free_segments().is_empty() {
            return;
        }
        let grammar = self.grammar;
        let Some(pattern) = grammar.pattern(id) else {
            return;
        };
        match pattern.functionality() {
            PatternFunctionality::Match(matched) => self.visit_match(pattern.name(), matched),
            PatternFunctionality::Wrapped(wrapped) => {
                self.visit_wrapped(id, pattern.name(), wrapped);
            }
            PatternFunctionality::Group(children) => {
                self.visit_alternatives(Owner::Pattern(id), children);
            }
            PatternFunctionality::GrammarRef => {
                self.visit_alternatives(Owner::Grammar, grammar.patterns());
            }
        }
    }

    /// Applies sibling patterns as competing alternatives.
    ///
    /// Each remaining sibling is tried against the current free text. The
    /// one whose output weighs most (the earliest on ties) is kept, which
    /// occupies its text, and the rest are tried again until none produces
    /// anything.
    pub(super) fn visit_alternatives(&mut self, owner: Owner, siblings: &[PatternId]) {
        let segments = self.free_segments();
        if segments.is_empty() {
            return;
        }
        let key = (owner, segments);
        if self.active.contains(&key) {
            warn!(
                target: SCANNER_TARGET,
                ?owner,
                "skipping re-entrant visit over unchanged text"
            );
            return;
        }
        self.active.insert(key.clone());

        let mut remaining = siblings.to_vec();
        while !remaining.is_empty() {
            let mut best: Option<(usize, usize, Vec<RawSpan>)> = None;
            for (position, sibling) in remaining.iter().enumerate() {
                let produced = self.speculate(*sibling);
                if produced.is_empty() {
                    continue;
                }
                let weight: usize = produced.iter().map(RawSpan::weight).sum();
                if best.as_ref().is_none_or(|(_, best_weight, _)| weight > *best_weight) {
                    best = Some((position, weight, produced));
                }
            }
            let Some((position, _, produced)) = best else {
                break;
            };
            remaining.remove(position);
            self.adopt(produced);
            if self.free_segments().is_empty() {
                break;
            }
        }

        self.active.remove(&key);
    }

    /// Runs `id` in a throwaway frame over the current window.
    fn speculate(&mut self, id: PatternId) -> Vec<RawSpan> {
        let window = self.window();
        self.begin(window);
        self.visit(id);
        self.withdraw()
    }

    fn visit_match(&mut self, name: Option<&Name>, matched: &Matched) {
        for found in self.search(&matched.regex, None) {
            self.begin(found.range.clone());
            self.set_scope(name.cloned());
            let Some(captures) = &matched.captures else {
                self.annotate_value();
                self.commit();
                continue;
            };
            self.commit_captures(captures, &found);
            self.commit();
        }
    }

    /// Commits one child span per participating, non-empty capture group.
    fn commit_captures(&mut self, captures: &CaptureCollection, found: &RegexMatch) {
        for capture in captures {
            let Some(range) = found.group(capture.index()) else {
                continue;
            };
            if range.is_empty() {
                continue;
            }
            self.begin(range);
            self.set_scope(Some(capture.name().clone()));
            self.annotate_value();
            self.commit();
        }
    }

    /// Pairs begin and end delimiters into regions, honouring nesting.
    ///
    /// For each begin match the end search first reaches only as far as the
    /// next begin match, then widens one begin at a time and finally to the
    /// window end. An end delimiter preceded by unclosed begin matches inside
    /// the searched region closes one of those instead and is skipped.
    fn visit_wrapped(&mut self, id: PatternId, name: Option<&Name>, wrapped: &Wrapped) {
        let begins = self.search(&wrapped.begin, None);
        let window_end = self.window().end;
        let mut current = 0;
        let mut horizon = Horizon::after(current, begins.len());

        while let Some(open) = begins.get(current) {
            let limit = match horizon {
                Horizon::Begin(index) => begins.get(index).map_or(window_end, |b| b.range.end),
                Horizon::WindowEnd => window_end,
            };
            let Some(close) = self.find_end(&wrapped.end, &begins, current, &(open.range.end..limit))
            else {
                match horizon {
                    Horizon::Begin(index) => {
                        horizon = Horizon::after(index, begins.len());
                    }
                    Horizon::WindowEnd => {
                        current += 1;
                        horizon = Horizon::after(current, begins.len());
                    }
                }
                continue;
            };

            let span_end = close.range.end;
            self.commit_region(id, name, wrapped, open, &close);
            let resume = begins
                .iter()
                .position(|begin| begin.range.start >= span_end)
                .unwrap_or(begins.len());
            current = resume.max(current + 1);
            horizon = Horizon::after(current, begins.len());
        }
    }

    /// Finds the end delimiter closing the begin match at `current`.
    fn find_end(
        &mut self,
        pattern: &str,
        begins: &[RegexMatch],
        current: usize,
        region: &Range<usize>,
    ) -> Option<RegexMatch> {
        if region.is_empty() {
            return None;
        }
        let mut skipped = 0;
        for close in self.search(pattern, Some(region)) {
            let opened = begins
                .iter()
                .skip(current + 1)
                .filter(|begin| {
                    begin.range.start >= region.start && begin.range.end <= close.range.start
                })
                .count();
            if opened > skipped {
                skipped += 1;
                continue;
            }
            return Some(close);
        }
        None
    }

    fn commit_region(
        &mut self,
        id: PatternId,
        name: Option<&Name>,
        wrapped: &Wrapped,
        open: &RegexMatch,
        close: &RegexMatch,
    ) {
        self.begin(open.range.start..close.range.end);
        self.set_scope(name.cloned());

        if let Some(captures) = &wrapped.begin_captures {
            self.commit_captures(captures, open);
        }

        let content = open.range.end..close.range.start;
        if !content.is_empty() {
            self.begin(content);
            let scope = wrapped
                .content_name
                .clone()
                .or_else(|| name.map(|name| name.child("content")));
            self.set_scope(scope);
            self.visit_alternatives(Owner::Pattern(id), &wrapped.children);
            self.commit_or_rollback();
        }

        if let Some(captures) = &wrapped.end_captures {
            self.commit_captures(captures, close);
        }
        self.commit();
    }
}

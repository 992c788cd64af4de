//! The span-building scanner.
//!
//! A scan keeps a stack of [`Frame`]s. Each frame covers a window of the
//! text and collects the spans its patterns produce. Committing a frame
//! assembles its children and hands the finished span to the parent frame,
//! which marks the range as occupied. Occupied ranges are withheld from
//! later regex searches in that frame and in every frame stacked above it.

mod visit;

use std::collections::HashSet;
use std::ops::Range;

use tmscan_core::{AnnotationValue, Annotations, Name, ScanConfig};
use tmscan_grammar::{Grammar, PatternId};

use crate::assembler::{RawSpan, assemble};
use crate::regex::{RegexCache, RegexMatch, find_all};

/// Tracing target for scanning.
pub(crate) const SCANNER_TARGET: &str = "tmscan::scanner";

/// A span being built over `window`.
#[derive(Debug)]
struct Frame {
    window: Range<usize>,
    scope: Option<Name>,
    annotations: Annotations,
    children: Vec<RawSpan>,
    occupied: Vec<Range<usize>>,
}

impl Frame {
    const fn new(window: Range<usize>) -> Self {
        Self {
            window,
            scope: None,
            annotations: Annotations::new(),
            children: Vec::new(),
            occupied: Vec::new(),
        }
    }

    fn is_bare(&self) -> bool {
        self.scope.is_none() && self.annotations.is_empty() && self.children.is_empty()
    }

    fn into_span(self) -> RawSpan {
        RawSpan {
            scope: self.scope,
            range: self.window,
            annotations: self.annotations,
            children: assemble(self.children),
        }
    }
}

/// Who is applying a list of alternatives, for the re-entrance guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Owner {
    /// The grammar's top-level patterns.
    Grammar,
    /// A group or the content of a begin/end pattern.
    Pattern(PatternId),
}

/// Per-scan mutable state.
pub(crate) struct Scanner<'a> {
    grammar: &'a Grammar,
    text: &'a str,
    config: &'a ScanConfig,
    regexes: RegexCache,
    frames: Vec<Frame>,
    active: HashSet<(Owner, Vec<Range<usize>>)>,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner whose root frame covers the whole text.
    pub(crate) fn new(grammar: &'a Grammar, text: &'a str, config: &'a ScanConfig) -> Self {
        Self {
            grammar,
            text,
            config,
            regexes: RegexCache::new(config),
            frames: vec![Frame::new(0..text.len())],
            active: HashSet::new(),
        }
    }

    /// Applies the grammar's top-level patterns to the whole text and returns
    /// the root span.
    pub(crate) fn run(mut self) -> RawSpan {
        let grammar = self.grammar;
        self.set_scope(Some(grammar.scope_name().clone()));
        self.annotate(
            "scopeName",
            AnnotationValue::from(grammar.scope_name().to_string()),
        );
        self.annotate("language", AnnotationValue::from(grammar.name()));
        if !self.text.is_empty() {
            self.visit_alternatives(Owner::Grammar, grammar.patterns());
        }

        let mut frames = self.frames;
        frames.truncate(1);
        frames
            .pop()
            .map_or_else(|| Frame::new(0..0).into_span(), Frame::into_span)
    }

    fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }

    fn top_mut(&mut self) -> Option<&mut Frame> {
        self.frames.last_mut()
    }

    fn window(&self) -> Range<usize> {
        self.top().map_or(0..0, |frame| frame.window.clone())
    }

    /// Opens a frame over `range`.
    fn begin(&mut self, range: Range<usize>) {
        self.frames.push(Frame::new(range));
    }

    /// Closes the current frame and passes its span to the parent.
    ///
    /// Zero-length spans are discarded.
    fn commit(&mut self) {
        if self.frames.len() < 2 {
            return;
        }
        let Some(frame) = self.frames.pop() else {
            return;
        };
        if frame.window.is_empty() {
            return;
        }
        let span = frame.into_span();
        self.adopt(vec![span]);
    }

    /// Discards the current frame and everything it collected.
    fn rollback(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Closes the current frame, committing it only if it carries anything.
    fn commit_or_rollback(&mut self) {
        if self.top().is_some_and(Frame::is_bare) {
            self.rollback();
        } else {
            self.commit();
        }
    }

    /// Closes the current frame and returns what it produced, unassembled.
    fn withdraw(&mut self) -> Vec<RawSpan> {
        if self.frames.len() < 2 {
            return Vec::new();
        }
        self.frames
            .pop()
            .map(|frame| frame.children)
            .unwrap_or_default()
    }

    /// Adds finished spans to the current frame and occupies their ranges.
    fn adopt(&mut self, spans: Vec<RawSpan>) {
        let Some(frame) = self.top_mut() else {
            return;
        };
        for span in spans {
            frame.occupied.push(span.range.clone());
            frame.children.push(span);
        }
    }

    fn set_scope(&mut self, scope: Option<Name>) {
        if let Some(frame) = self.top_mut() {
            frame.scope = scope;
        }
    }

    fn annotate(&mut self, key: &str, value: AnnotationValue) {
        if let Some(frame) = self.top_mut() {
            frame.annotations.insert(key.to_owned(), value);
        }
    }

    /// Annotates the current frame with the text it covers.
    fn annotate_value(&mut self) {
        let window = self.window();
        let value = self.text.get(window).unwrap_or_default();
        let key = self.config.value_annotation_key().to_owned();
        self.annotate(&key, AnnotationValue::from(value));
    }

    /// The parts of the current window not occupied by this frame or any
    /// frame below it, in order.
    fn free_segments(&self) -> Vec<Range<usize>> {
        let window = self.window();
        if window.is_empty() {
            return Vec::new();
        }

        let mut blocked: Vec<Range<usize>> = self
            .frames
            .iter()
            .flat_map(|frame| frame.occupied.iter())
            .filter(|range| range.start < window.end && window.start < range.end)
            .cloned()
            .collect();
        blocked.sort_by_key(|range| range.start);

        let mut segments = Vec::new();
        let mut cursor = window.start;
        for range in blocked {
            if range.start > cursor {
                segments.push(cursor..range.start.min(window.end));
            }
            cursor = cursor.max(range.end);
            if cursor >= window.end {
                break;
            }
        }
        if cursor < window.end {
            segments.push(cursor..window.end);
        }
        segments
    }

    /// Searches the free segments, optionally clipped to `bounds`.
    fn search(&mut self, pattern: &str, bounds: Option<&Range<usize>>) -> Vec<RegexMatch> {
        let Some(regex) = self.regexes.get(pattern) else {
            return Vec::new();
        };
        let mut found = Vec::new();
        for segment in self.free_segments() {
            let segment = bounds.map_or_else(
                || segment.clone(),
                |bounds| segment.start.max(bounds.start)..segment.end.min(bounds.end),
            );
            if segment.is_empty() {
                continue;
            }
            found.extend(find_all(&regex, self.text, &segment));
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use tmscan_grammar::compile_json;

    use super::*;

    fn grammar() -> Grammar {
        compile_json(
            r#"{"name": "T", "scopeName": "source.t", "patterns": [{"match": "x"}]}"#,
        )
        .expect("grammar compiles")
    }

    #[test]
    fn free_segments_skip_occupied_ranges_of_ancestors() {
        let grammar = grammar();
        let config = ScanConfig::default();
        let mut scanner = Scanner::new(&grammar, "0123456789", &config);
        scanner.adopt(vec![RawSpan {
            scope: None,
            range: 2..4,
            annotations: Annotations::new(),
            children: Vec::new(),
        }]);
        scanner.begin(1..9);
        scanner.adopt(vec![RawSpan {
            scope: None,
            range: 6..7,
            annotations: Annotations::new(),
            children: Vec::new(),
        }]);
        assert_eq!(scanner.free_segments(), vec![1..2, 4..6, 7..9]);
    }

    #[test]
    fn committing_an_empty_frame_leaves_no_trace() {
        let grammar = grammar();
        let config = ScanConfig::default();
        let mut scanner = Scanner::new(&grammar, "abc", &config);
        scanner.begin(1..1);
        scanner.set_scope(Some(Name::new("empty")));
        scanner.commit();
        assert_eq!(scanner.free_segments(), vec![0..3]);
        assert!(scanner.top().is_some_and(|frame| frame.children.is_empty()));
    }

    #[test]
    fn rollback_discards_the_frame_and_its_children() {
        let grammar = grammar();
        let config = ScanConfig::default();
        let mut scanner = Scanner::new(&grammar, "abcdef", &config);
        scanner.begin(0..6);
        scanner.begin(1..3);
        scanner.set_scope(Some(Name::new("kw")));
        scanner.commit();
        scanner.rollback();
        assert_eq!(scanner.frames.len(), 1);
        assert_eq!(scanner.free_segments(), vec![0..6]);
    }

    #[test]
    fn bare_frames_are_rolled_back_instead_of_committed() {
        let grammar = grammar();
        let config = ScanConfig::default();
        let mut scanner = Scanner::new(&grammar, "abcdef", &config);
        scanner.begin(2..4);
        scanner.commit_or_rollback();
        assert_eq!(scanner.free_segments(), vec![0..6]);
        scanner.begin(2..4);
        scanner.set_scope(Some(Name::new("kw")));
        scanner.commit_or_rollback();
        assert_eq!(scanner.free_segments(), vec![0..2, 4..6]);
    }

    #[test]
    fn withdraw_returns_children_without_occupying() {
        let grammar = grammar();
        let config = ScanConfig::default();
        let mut scanner = Scanner::new(&grammar, "abcdef", &config);
        scanner.begin(0..6);
        scanner.begin(1..3);
        scanner.set_scope(Some(Name::new("kw")));
        scanner.commit();
        let produced = scanner.withdraw();
        assert_eq!(produced.len(), 1);
        assert_eq!(scanner.free_segments(), vec![0..6]);
    }
}

//! Regex compilation with graceful degradation and a per-scan cache.
//!
//! Grammar regexes are written for Oniguruma, so they are compiled with
//! `fancy_regex`, which supports look-around and backreferences. A pattern
//! is first tried in extended (`(?x)`) mode, then in plain mode, and finally
//! as an escaped literal. A single malformed pattern therefore never fails a
//! scan.

use std::collections::HashMap;
use std::ops::Range;
use std::rc::Rc;

use fancy_regex::Regex;
use tmscan_core::ScanConfig;
use tracing::warn;

/// Tracing target for regex compilation and search.
const REGEX_TARGET: &str = "tmscan::regex";

/// One non-empty match with the absolute byte ranges of its groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RegexMatch {
    pub(crate) range: Range<usize>,
    /// Group ranges by index; `None` when the group did not participate.
    pub(crate) groups: Vec<Option<Range<usize>>>,
}

impl RegexMatch {
    pub(crate) fn group(&self, index: usize) -> Option<Range<usize>> {
        self.groups.get(index).cloned().flatten()
    }
}

/// Compiled regexes keyed by their source text.
///
/// `None` entries remember patterns that could not be compiled in any mode.
#[derive(Debug)]
pub(crate) struct RegexCache {
    extended_syntax: bool,
    anchors_match_lines: bool,
    literal_fallback: bool,
    compiled: HashMap<String, Option<Rc<Regex>>>,
}

impl RegexCache {
    pub(crate) fn new(config: &ScanConfig) -> Self {
        Self {
            extended_syntax: config.extended_syntax(),
            anchors_match_lines: config.anchors_match_lines(),
            literal_fallback: config.literal_fallback(),
            compiled: HashMap::new(),
        }
    }

    /// Returns the compiled form of `pattern`, compiling it on first use.
    pub(crate) fn get(&mut self, pattern: &str) -> Option<Rc<Regex>> {
        if let Some(cached) = self.compiled.get(pattern) {
            return cached.clone();
        }
        let compiled = self.compile(pattern).map(Rc::new);
        self.compiled.insert(pattern.to_owned(), compiled.clone());
        compiled
    }

    fn compile(&self, pattern: &str) -> Option<Regex> {
        let lines = if self.anchors_match_lines { "m" } else { "" };

        if self.extended_syntax
            && let Ok(regex) = Regex::new(&format!("(?{lines}x){pattern}"))
        {
            return Some(regex);
        }

        let plain = if lines.is_empty() {
            Regex::new(pattern)
        } else {
            Regex::new(&format!("(?{lines}){pattern}"))
        };
        let error = match plain {
            Ok(regex) => {
                if self.extended_syntax {
                    warn!(
                        target: REGEX_TARGET,
                        pattern,
                        "pattern rejected in extended mode, compiled without it"
                    );
                }
                return Some(regex);
            }
            Err(error) => error,
        };

        if !self.literal_fallback {
            warn!(
                target: REGEX_TARGET,
                pattern,
                error = %error,
                "pattern failed to compile and will never match"
            );
            return None;
        }

        warn!(
            target: REGEX_TARGET,
            pattern,
            error = %error,
            "pattern failed to compile, matching it literally"
        );
        Regex::new(&fancy_regex::escape(pattern)).ok()
    }
}

/// Finds every non-overlapping, non-empty match of `regex` inside `segment`.
///
/// The segment is searched as if it were the whole input, so `^` and
/// look-behind do not see text outside it. Returned ranges are absolute.
pub(crate) fn find_all(regex: &Regex, text: &str, segment: &Range<usize>) -> Vec<RegexMatch> {
    let Some(haystack) = text.get(segment.clone()) else {
        return Vec::new();
    };
    let offset = segment.start;
    let mut found = Vec::new();

    for captures in regex.captures_iter(haystack) {
        let captures = match captures {
            Ok(captures) => captures,
            Err(error) => {
                warn!(
                    target: REGEX_TARGET,
                    pattern = regex.as_str(),
                    error = %error,
                    "regex search aborted"
                );
                break;
            }
        };
        let Some(whole) = captures.get(0) else {
            continue;
        };
        if whole.start() == whole.end() {
            continue;
        }
        let groups = (0..captures.len())
            .map(|index| {
                captures
                    .get(index)
                    .map(|group| group.start() + offset..group.end() + offset)
            })
            .collect();
        found.push(RegexMatch {
            range: whole.start() + offset..whole.end() + offset,
            groups,
        });
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> RegexCache {
        RegexCache::new(&ScanConfig::default())
    }

    #[test]
    fn extended_mode_ignores_whitespace_and_comments() {
        let regex = cache().get("a b # trailing comment").expect("compiles");
        let found = find_all(&regex, "xab", &(0..3));
        assert_eq!(found.first().map(|m| m.range.clone()), Some(1..3));
    }

    #[test]
    fn anchors_match_at_line_starts() {
        let regex = cache().get("^x").expect("compiles");
        let found = find_all(&regex, "x\nx", &(0..3));
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn pattern_rejected_in_extended_mode_compiles_plain() {
        // `#)` opens a comment under `x`, leaving the group unclosed.
        let regex = cache().get("(a#)").expect("plain fallback");
        let found = find_all(&regex, "xa#y", &(0..4));
        let only = found.first().expect("one match");
        assert_eq!(only.range, 1..3);
        assert_eq!(only.group(1), Some(1..3));
    }

    #[test]
    fn malformed_pattern_degrades_to_literal() {
        let regex = cache().get("a(b").expect("literal fallback");
        let found = find_all(&regex, "xa(b", &(0..4));
        assert_eq!(found.first().map(|m| m.range.clone()), Some(1..4));
    }

    #[test]
    fn malformed_pattern_without_fallback_never_matches() {
        let config = ScanConfig::new(true, true, false, String::from("value"));
        assert!(RegexCache::new(&config).get("a(b").is_none());
    }

    #[test]
    fn cache_returns_the_same_instance() {
        let mut cache = cache();
        let first = cache.get("abc").expect("compiles");
        let second = cache.get("abc").expect("compiles");
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn zero_width_matches_are_discarded() {
        let regex = cache().get("x*").expect("compiles");
        let found = find_all(&regex, "axxb", &(0..4));
        let ranges: Vec<_> = found.iter().map(|m| m.range.clone()).collect();
        assert_eq!(ranges, vec![1..3]);
    }

    #[test]
    fn segment_offsets_are_absolute_and_groups_recorded() {
        let regex = cache().get("(a)|(b)").expect("compiles");
        let found = find_all(&regex, "zzb", &(1..3));
        let only = found.first().expect("one match");
        assert_eq!(only.range, 2..3);
        assert_eq!(only.group(1), None);
        assert_eq!(only.group(2), Some(2..3));
    }
}

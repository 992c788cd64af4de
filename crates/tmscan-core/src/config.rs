//! Scan configuration for regex dialect and annotation settings.

/// Default annotation key holding the literal text of a match or capture.
const DEFAULT_VALUE_KEY: &str = "value";

/// Scan configuration controlling how grammar regexes are compiled and how
/// matched text is annotated.
///
/// # Defaults
///
/// The default configuration mirrors TextMate's regex conventions:
///
/// - `extended_syntax`: `true` (commented, whitespace-insensitive patterns
///   are tried first)
/// - `anchors_match_lines`: `true` (`^` and `$` match at line boundaries)
/// - `literal_fallback`: `true` (an uncompilable pattern matches its own
///   text literally)
/// - `value_annotation_key`: `"value"`
///
/// # Example
///
/// ```
/// use tmscan_core::ScanConfig;
///
/// let config = ScanConfig::default();
/// assert!(config.extended_syntax());
/// assert_eq!(config.value_annotation_key(), "value");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Whether `(?x)` mode is tried before plain syntax.
    extended_syntax: bool,
    /// Whether `^`/`$` match at every line boundary.
    anchors_match_lines: bool,
    /// Whether uncompilable patterns degrade to escaped literals.
    literal_fallback: bool,
    /// Annotation key used for captured text.
    value_annotation_key: String,
}

impl ScanConfig {
    /// Creates a configuration with explicit values.
    #[must_use]
    pub const fn new(
        extended_syntax: bool,
        anchors_match_lines: bool,
        literal_fallback: bool,
        value_annotation_key: String,
    ) -> Self {
        Self {
            extended_syntax,
            anchors_match_lines,
            literal_fallback,
            value_annotation_key,
        }
    }

    /// Returns whether extended syntax is attempted first.
    #[must_use]
    pub const fn extended_syntax(&self) -> bool {
        self.extended_syntax
    }

    /// Returns whether anchors match at line boundaries.
    #[must_use]
    pub const fn anchors_match_lines(&self) -> bool {
        self.anchors_match_lines
    }

    /// Returns whether malformed patterns fall back to literal matching.
    #[must_use]
    pub const fn literal_fallback(&self) -> bool {
        self.literal_fallback
    }

    /// Returns the annotation key for matched text.
    #[must_use]
    pub fn value_annotation_key(&self) -> &str {
        &self.value_annotation_key
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extended_syntax: true,
            anchors_match_lines: true,
            literal_fallback: true,
            value_annotation_key: DEFAULT_VALUE_KEY.to_owned(),
        }
    }
}

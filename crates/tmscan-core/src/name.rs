//! Hierarchical scope names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A dotted scope identifier such as `keyword.control.if`.
///
/// Names compare and hash over their full segment sequence. They serialize
/// as the dotted string form.
///
/// # Example
///
/// ```
/// use tmscan_core::Name;
///
/// let name = Name::new("string.quoted.double");
/// assert_eq!(name.segments(), ["string", "quoted", "double"]);
/// assert_eq!(name.to_string(), "string.quoted.double");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name {
    segments: Vec<String>,
}

impl Name {
    /// Creates a name by splitting `dotted` on `.`.
    #[must_use]
    pub fn new(dotted: &str) -> Self {
        Self {
            segments: dotted.split('.').map(str::to_owned).collect(),
        }
    }

    /// Returns the ordered segments of this name.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the first segment, which TextMate uses as the scope category.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    /// Returns a new name with `segment` appended.
    #[must_use]
    pub fn child(&self, segment: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.to_owned());
        Self { segments }
    }

    /// Returns whether this name marks invalid or unmatched content.
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        self.category() == Some("invalid")
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl FromStr for Name {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Serialize for Name {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let dotted = String::deserialize(deserializer)?;
        Ok(Self::new(&dotted))
    }
}

//! Error types for grammar decoding and compilation.
//!
//! Every failure aborts compilation as a whole: no partially resolved
//! [`Grammar`](crate::Grammar) is ever returned.

use thiserror::Error;

/// Errors from decoding or compiling a grammar document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GrammarError {
    /// A `#name` include had no matching repository entry in scope.
    #[error("included pattern not found: #{name}")]
    IncludeNotFound {
        /// The repository entry name, without the leading `#`.
        name: String,
    },

    /// An include string was neither `#name`, `$self` nor `$base`.
    #[error("invalid include: {include}")]
    InvalidInclude {
        /// The include string as written in the document.
        include: String,
    },

    /// A rule is structurally invalid.
    #[error("invalid grammar rule: {message}")]
    Schema {
        /// Description of the violation.
        message: String,
    },

    /// The document is not well-formed JSON or has mistyped fields.
    #[error("failed to decode grammar document: {0}")]
    Decode(#[from] serde_json::Error),
}

impl GrammarError {
    /// Creates an include-not-found error.
    #[must_use]
    pub fn include_not_found(name: impl Into<String>) -> Self {
        Self::IncludeNotFound { name: name.into() }
    }

    /// Creates an invalid include error.
    #[must_use]
    pub fn invalid_include(include: impl Into<String>) -> Self {
        Self::InvalidInclude {
            include: include.into(),
        }
    }

    /// Creates a schema violation error.
    #[must_use]
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }
}

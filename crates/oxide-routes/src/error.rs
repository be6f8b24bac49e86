//! Error types for routing.

use thiserror::Error;

/// Why a route pattern was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternErrorKind {
    /// The pattern string was empty.
    #[error("pattern is empty")]
    Empty,

    /// A segment looks like a placeholder but is not `{identifier}`.
    #[error("malformed placeholder `{0}`")]
    MalformedPlaceholder(String),

    /// The same placeholder name appears twice in one pattern.
    #[error("placeholder `{0}` is used more than once")]
    DuplicatePlaceholder(String),
}

/// Router-specific errors.
#[derive(Debug, Error)]
pub enum RouterError {
    /// Invalid path pattern.
    #[error("invalid path pattern `{pattern}`: {reason}")]
    InvalidPattern {
        pattern: String,
        reason: PatternErrorKind,
    },

    /// A route declaration could not be used.
    #[error("invalid route configuration: {0}")]
    Config(String),

    /// Route declarations were not valid JSON.
    #[error("route configuration is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Route declarations could not be read.
    #[error("failed to read route configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Route arguments did not fit the requested type.
    #[error("invalid route arguments: {0}")]
    InvalidArguments(String),
}

impl RouterError {
    pub(crate) fn invalid_pattern(pattern: &str, reason: PatternErrorKind) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        }
    }
}

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;

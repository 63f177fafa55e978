//! Version errors

/// Errors raised by patterns and versions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    /// Id does not match the pattern
    #[error("cannot parse version {id:?}: {reason}")]
    Parse {
        /// Text that failed to parse
        id: String,
        /// What did not match
        reason: String,
    },

    /// Incremented past the last version the pattern can express
    #[error("version {id} has no successor")]
    Overflow {
        /// Id of the last version
        id: String,
    },

    /// Versions built from different patterns
    #[error("versions belong to different patterns")]
    PatternMismatch,

    /// Pattern definition is unusable
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),
}

impl VersionError {
    /// Create parse error
    #[inline]
    #[must_use]
    pub fn parse(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for version operations.
pub type VersionResult<T> = Result<T, VersionError>;

//! Error types for cfgshift updates

use cfgshift_document::{DocumentError, RouteError};
use cfgshift_version::VersionError;

/// Errors aborting an update run
///
/// A failed run may leave the user document partially updated.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    /// Document could not be read, built or cloned into
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Version id or pattern problem
    #[error("version error: {0}")]
    Version(#[from] VersionError),

    /// Invalid route in update configuration
    #[error("invalid route: {0}")]
    Route(#[from] RouteError),

    /// Update configuration could not be parsed
    #[error("invalid update configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Default document has no readable version
    #[error("default document has no version")]
    MissingDefaultVersion,

    /// User document is newer than the default and downgrading is disabled
    #[error("user version {user} is newer than default version {default}, downgrading is disabled")]
    DowngradeNotAllowed {
        /// Version id of the user document
        user: String,
        /// Version id of the default document
        default: String,
    },
}

impl UpdateError {
    /// Check if error comes from the update configuration rather than the
    /// documents
    #[inline]
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Route(_) | Self::Yaml(_) | Self::Version(VersionError::InvalidPattern(_))
        )
    }
}

/// Result type for update operations.
pub type UpdateResult<T> = Result<T, UpdateError>;

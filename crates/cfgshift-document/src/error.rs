//! Document-level errors

use crate::route::RouteError;
use crate::types::AdapterError;

/// Errors raised while loading, building or writing documents
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Invalid route
    #[error("invalid route: {0}")]
    Route(#[from] RouteError),

    /// Document structure is not a single mapping
    #[error("malformed document: {reason}")]
    Malformed {
        /// What is wrong with the structure
        reason: String,
    },

    /// YAML could not be read or written
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Custom type adapter rejected a value
    #[error("type adapter for !{tag} failed: {source}")]
    TypeAdapter {
        /// Tag the adapter is registered under
        tag: String,
        /// The underlying error
        #[source]
        source: AdapterError,
    },

    /// Key that does not fit on a single line
    #[error("key cannot be written as a plain mapping key: {0}")]
    UnrepresentableKey(String),
}

impl DocumentError {
    /// Create malformed-document error
    #[inline]
    #[must_use]
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }

    /// Create adapter error
    #[inline]
    #[must_use]
    pub fn type_adapter(tag: impl Into<String>, source: AdapterError) -> Self {
        Self::TypeAdapter {
            tag: tag.into(),
            source,
        }
    }
}

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

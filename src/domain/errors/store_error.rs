//! Remote document store error types.

use thiserror::Error;

/// Document store error variants.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum StoreError {
    /// Store unreachable or temporarily unavailable.
    #[error("network error talking to the document store: {message}")]
    NetworkError { message: String },

    /// Request refused by the store.
    #[error("request rejected by the document store: {message}")]
    Rejected { message: String },

    /// Collection or document does not exist.
    #[error("document not found: {path}")]
    NotFound { path: String },

    /// Response body could not be decoded.
    #[error("malformed response from the document store: {message}")]
    MalformedResponse { message: String },

    /// Snapshot stream ended without an error event.
    #[error("subscription closed by the document store")]
    SubscriptionClosed,

    /// Anything else.
    #[error("unexpected document store error: {message}")]
    Unexpected { message: String },
}

impl StoreError {
    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError {
            message: message.into(),
        }
    }

    /// Creates rejected error.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Creates not found error.
    #[must_use]
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Creates malformed response error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Creates unexpected error.
    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Returns whether error is network related.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::NetworkError { .. })
    }
}

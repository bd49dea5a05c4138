//! Error types for blob stores and share transport.

use thiserror::Error;

use crate::blob_store::BlobHandle;

/// Errors for blob store and transport operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No blob is stored under the handle.
    #[error("blob not found: {0}")]
    NotFound(BlobHandle),

    /// Storing the blob would exceed the configured quota.
    #[error("storage quota exceeded: {used} / {max} bytes")]
    QuotaExceeded {
        /// Bytes already in use.
        used: u64,
        /// Configured limit.
        max: u64,
    },

    /// Stored content no longer hashes to its handle.
    #[error("content does not match handle: {0}")]
    IntegrityMismatch(BlobHandle),

    /// Handle text is not 64 lowercase hex characters.
    #[error("invalid blob handle: {0:?}")]
    InvalidHandle(String),

    /// A transport-encoded share is well-formed JSON but not a valid share.
    #[error("invalid share: {reason}")]
    InvalidShare {
        /// What was wrong with it.
        reason: String,
    },

    /// Filesystem failure in a directory-backed store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport JSON could not be parsed or produced.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

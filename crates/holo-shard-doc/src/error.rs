//! Error types for the document pipeline.

use holo_shard_crypto::ShardError;
use thiserror::Error;

/// Errors for splitting and combining documents.
#[derive(Debug, Error)]
pub enum DocError {
    /// No element with the requested `idShort` carries a `value`.
    #[error("element '{0}' not found")]
    ElementNotFound(String),

    /// None of the supplied documents holds a parseable shard.
    #[error("no valid shards found")]
    NoValidShards,

    /// Failure from the sharing or encoding layer.
    #[error(transparent)]
    Shard(#[from] ShardError),
}

/// Result type for document operations.
pub type DocResult<T> = Result<T, DocError>;

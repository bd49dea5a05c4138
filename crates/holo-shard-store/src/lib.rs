//! Blob storage for holo-shard key shares.
//!
//! # Overview
//!
//! - **Blob stores**: content-addressed `put`/`get` keyed by SHA-256, with an
//!   in-memory backend and a directory backend
//! - **Transport**: key shares as compact JSON with a base64 payload
//! - **Placement**: one blob per share via [`store_shares`] and
//!   [`fetch_shares`]

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod blob_store;
mod error;
mod transport;

pub use blob_store::{
    BlobHandle, BlobStore, DirBlobStore, HANDLE_LEN, MemoryBlobStore, MemoryBlobStoreConfig,
};
pub use error::{StoreError, StoreResult};
pub use transport::{deserialize_share, fetch_shares, serialize_share, store_shares};

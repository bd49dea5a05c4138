//! Asset-document sharding for holo-shard.
//!
//! One element of a JSON asset document (located by `idShort`) is split into
//! `SHARD_V1:<index>:<value>` shares, one per output document. Any threshold
//! of those documents restores the original.
//!
//! # Example
//!
//! ```rust
//! use holo_shard_doc::{combine_documents, split_document};
//! use serde_json::json;
//!
//! let doc = json!({
//!     "submodels": [{
//!         "submodelElements": [{ "idShort": "MasterKey", "value": "TopSecretValue" }]
//!     }]
//! });
//!
//! let shards = split_document(&doc, "MasterKey", 3, 2).unwrap();
//! let (restored, secret) = combine_documents(&shards[1..], "MasterKey").unwrap();
//!
//! assert_eq!(secret, "TopSecretValue");
//! assert_eq!(restored, doc);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod locator;
mod pipeline;

pub use error::{DocError, DocResult};
pub use locator::{DocumentLocator, JsonLocator, Replacement, SHARD_DESCRIPTION};
pub use pipeline::{
    DocSplitOptions, combine_documents, combine_with, split_document, split_with, split_with_rng,
};

//! Split one element of a document into shard documents, and combine them
//! back.
//!
//! Each shard document is a full copy of the source with the target value
//! replaced by one `SHARD_V1:` share. Any `threshold` of them restore it.

use holo_shard_crypto::FieldShare;
use holo_shard_crypto::encoding::{parse_shard, recover_string, split_string_with_rng};
use rand::{CryptoRng, RngCore, rngs::OsRng};
use serde_json::Value;

use crate::error::{DocError, DocResult};
use crate::locator::{DocumentLocator, JsonLocator, Replacement};

/// Parameters for [`split_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocSplitOptions {
    /// Identifier of the element whose value is split.
    pub target_id: String,
    /// Number of shard documents to produce.
    pub total: usize,
    /// Number of shard documents needed to restore.
    pub threshold: usize,
}

impl DocSplitOptions {
    /// Options for `target_id` with a 2-of-3 split.
    #[must_use]
    pub fn new(target_id: impl Into<String>) -> Self {
        Self {
            target_id: target_id.into(),
            total: 3,
            threshold: 2,
        }
    }

    /// Set the number of shard documents.
    #[must_use]
    pub fn with_total(mut self, total: usize) -> Self {
        self.total = total;
        self
    }

    /// Set the restore threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }
}

/// Split the target value of `doc` into `options.total` shard documents.
///
/// # Errors
///
/// Returns `ElementNotFound` if the target is absent, and sharing errors
/// (`SecretTooLarge`, threshold validation) from the crypto layer.
pub fn split_with<L: DocumentLocator>(
    locator: &L,
    doc: &L::Document,
    options: &DocSplitOptions,
) -> DocResult<Vec<L::Document>> {
    split_with_rng(locator, &mut OsRng, doc, options)
}

/// [`split_with`] drawing the polynomial from `rng`.
///
/// # Errors
///
/// Same as [`split_with`].
pub fn split_with_rng<L: DocumentLocator, R: RngCore + CryptoRng>(
    locator: &L,
    rng: &mut R,
    doc: &L::Document,
    options: &DocSplitOptions,
) -> DocResult<Vec<L::Document>> {
    let target = options.target_id.as_str();
    let secret = locator
        .find(doc, target)
        .ok_or_else(|| DocError::ElementNotFound(target.to_owned()))?;

    let shards = split_string_with_rng(rng, &secret, options.total, options.threshold)?;

    let docs = shards
        .iter()
        .map(|shard| {
            let mut copy = doc.clone();
            if locator.replace(&mut copy, target, &shard.to_string(), Replacement::Shard) {
                Ok(copy)
            } else {
                Err(DocError::ElementNotFound(target.to_owned()))
            }
        })
        .collect::<DocResult<Vec<_>>>()?;

    tracing::info!(
        element = target,
        total = options.total,
        threshold = options.threshold,
        "split document into shards"
    );
    Ok(docs)
}

/// Recover the target value from shard documents.
///
/// Documents without the target, or whose target value is not a shard, are
/// skipped. The restored document is a copy of the first one with the
/// recovered value written back and the shard marker removed.
///
/// # Errors
///
/// Returns `NoValidShards` if nothing parses, sharing errors from recovery
/// (`DuplicateIndex`, `InvalidUtf8`), and `ElementNotFound` if the first
/// document lacks the target.
pub fn combine_with<L: DocumentLocator>(
    locator: &L,
    docs: &[L::Document],
    target_id: &str,
) -> DocResult<(L::Document, String)> {
    let shards: Vec<FieldShare> = docs
        .iter()
        .filter_map(|doc| locator.find(doc, target_id))
        .filter_map(|value| parse_shard(&value))
        .collect();

    let skipped = docs.len() - shards.len();
    if skipped > 0 {
        tracing::debug!(skipped, "ignored documents without a shard");
    }

    if shards.is_empty() {
        return Err(DocError::NoValidShards);
    }
    let first = docs.first().ok_or(DocError::NoValidShards)?;

    let secret = recover_string(&shards)?;

    let mut restored = first.clone();
    if !locator.replace(&mut restored, target_id, &secret, Replacement::Restored) {
        return Err(DocError::ElementNotFound(target_id.to_owned()));
    }

    tracing::info!(element = target_id, shards = shards.len(), "restored document");
    Ok((restored, secret))
}

/// Split the `target_id` element of a JSON document `n` ways with threshold `k`.
///
/// # Errors
///
/// Same as [`split_with`].
pub fn split_document(doc: &Value, target_id: &str, n: usize, k: usize) -> DocResult<Vec<Value>> {
    let options = DocSplitOptions::new(target_id)
        .with_total(n)
        .with_threshold(k);
    split_with(&JsonLocator, doc, &options)
}

/// Combine JSON shard documents, returning the restored document and secret.
///
/// # Errors
///
/// Same as [`combine_with`].
pub fn combine_documents(docs: &[Value], target_id: &str) -> DocResult<(Value, String)> {
    combine_with(&JsonLocator, docs, target_id)
}

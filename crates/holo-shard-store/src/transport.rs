//! Transport encoding of key shares and share placement in a blob store.
//!
//! A share travels as compact JSON: `{"index":N,"payload":"<base64>"}`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use holo_shard_crypto::KeyShare;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::blob_store::{BlobHandle, BlobStore};
use crate::error::{StoreError, StoreResult};

#[derive(Serialize)]
struct WireShareOut<'a> {
    index: u8,
    payload: &'a str,
}

#[derive(Deserialize)]
struct WireShareIn {
    index: Value,
    payload: String,
}

fn invalid(reason: impl Into<String>) -> StoreError {
    StoreError::InvalidShare {
        reason: reason.into(),
    }
}

/// Encode a share for transport.
///
/// # Errors
/// Returns a serialization error if JSON encoding fails.
pub fn serialize_share(share: &KeyShare) -> StoreResult<Vec<u8>> {
    let payload = BASE64.encode(share.payload());
    let wire = WireShareOut {
        index: share.index(),
        payload: &payload,
    };
    Ok(serde_json::to_vec(&wire)?)
}

/// Decode a transport-encoded share.
///
/// The payload length is not checked here; [`holo_shard_crypto::combine_key`]
/// does that.
///
/// # Errors
/// Returns `Json` for malformed JSON or missing fields and `InvalidShare`
/// for a non-integer or out-of-range index or a bad base64 payload.
pub fn deserialize_share(bytes: &[u8]) -> StoreResult<KeyShare> {
    let wire: WireShareIn = serde_json::from_slice(bytes)?;

    let index = wire
        .index
        .as_u64()
        .ok_or_else(|| invalid("share index must be an integer"))?;
    let index = u8::try_from(index)
        .ok()
        .filter(|&i| i != 0)
        .ok_or_else(|| invalid(format!("share index {index} outside 1..=255")))?;

    let payload = BASE64
        .decode(wire.payload.as_bytes())
        .map_err(|e| invalid(format!("payload is not base64: {e}")))?;

    Ok(KeyShare::new(index, payload))
}

/// Store each share as its own blob; handles come back in share order.
///
/// # Errors
/// Returns the first store or serialization failure.
pub fn store_shares<S: BlobStore + ?Sized>(
    store: &S,
    shares: &[KeyShare],
) -> StoreResult<Vec<BlobHandle>> {
    let handles = shares
        .iter()
        .map(|share| store.put(&serialize_share(share)?))
        .collect::<StoreResult<Vec<_>>>()?;
    tracing::info!(count = handles.len(), "stored key shares");
    Ok(handles)
}

/// Fetch and decode the shares stored under `handles`.
///
/// # Errors
/// Returns the first missing, corrupt, or undecodable blob.
pub fn fetch_shares<S: BlobStore + ?Sized>(
    store: &S,
    handles: &[BlobHandle],
) -> StoreResult<Vec<KeyShare>> {
    let shares = handles
        .iter()
        .map(|handle| deserialize_share(&store.get(handle)?))
        .collect::<StoreResult<Vec<_>>>()?;
    tracing::info!(count = shares.len(), "fetched key shares");
    Ok(shares)
}

//! k-of-n sharing of a 256-bit envelope key.
//!
//! The key is cut into two 16-byte halves and each half is shared on its own
//! with the GF(2^8) primitive. Share `i` carries `half_1[i] || half_2[i]`, so
//! every share payload is exactly [`KEY_SIZE`] bytes and the two halves are
//! reconstructed independently.
//!
//! # Example
//!
//! ```rust
//! use holo_shard_crypto::envelope::EnvelopeKey;
//! use holo_shard_crypto::key_split::{combine_key, split_key};
//!
//! let key = EnvelopeKey::generate();
//! let shares = split_key(key.as_bytes(), 3, 5).unwrap();
//!
//! let recovered = combine_key(&shares[1..4]).unwrap();
//! assert_eq!(recovered.as_bytes(), key.as_bytes());
//! ```

use rand::{CryptoRng, RngCore, rngs::OsRng};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::envelope::{EnvelopeKey, KEY_SIZE};
use crate::error::{ShardError, ShardResult};
use crate::gf256;

/// Half of a key, the block size handed to the GF(2^8) primitive.
pub const HALF_KEY: usize = KEY_SIZE / 2;

/// Largest share count; indices must fit in one byte and 0 is reserved.
pub const MAX_SHARES: usize = 255;

/// One share of an envelope key.
///
/// `payload` is kept as a byte vector because shares arrive from transport;
/// its length is checked by [`combine_key`].
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyShare {
    #[zeroize(skip)]
    index: u8,
    payload: Vec<u8>,
}

impl KeyShare {
    /// Create a share from an index and payload.
    #[must_use]
    pub fn new(index: u8, payload: Vec<u8>) -> Self {
        Self { index, payload }
    }

    /// Share index (x-coordinate).
    #[must_use]
    pub const fn index(&self) -> u8 {
        self.index
    }

    /// Share payload bytes.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

impl PartialEq for KeyShare {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && bool::from(self.payload.ct_eq(&other.payload))
    }
}

impl Eq for KeyShare {}

impl std::fmt::Debug for KeyShare {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyShare")
            .field("index", &self.index)
            .field("len", &self.payload.len())
            .field("payload", &"[redacted]")
            .finish()
    }
}

/// Check `1 <= threshold <= total <= 255`.
///
/// # Errors
///
/// Returns the first violated bound.
pub fn validate_thresholds(threshold: usize, total: usize) -> ShardResult<()> {
    if threshold < 1 {
        return Err(ShardError::ThresholdTooSmall);
    }
    if total < 1 {
        return Err(ShardError::TotalTooSmall);
    }
    if threshold > total {
        return Err(ShardError::ThresholdExceedsTotal { threshold, total });
    }
    if total > MAX_SHARES {
        return Err(ShardError::TooManyShares {
            total,
            max: MAX_SHARES,
        });
    }
    Ok(())
}

/// Split a 32-byte key into `total` shares, any `threshold` of which recover it.
///
/// # Errors
///
/// Returns a validation error if the key is not 32 bytes or the
/// threshold/total pair is out of range.
pub fn split_key(key: &[u8], threshold: usize, total: usize) -> ShardResult<Vec<KeyShare>> {
    split_key_with_rng(&mut OsRng, key, threshold, total)
}

/// Split a key using a provided RNG.
///
/// # Errors
///
/// Same as [`split_key`].
pub fn split_key_with_rng<R: RngCore + CryptoRng>(
    rng: &mut R,
    key: &[u8],
    threshold: usize,
    total: usize,
) -> ShardResult<Vec<KeyShare>> {
    if key.len() != KEY_SIZE {
        return Err(ShardError::InvalidKeyLength {
            expected: KEY_SIZE,
            actual: key.len(),
        });
    }
    validate_thresholds(threshold, total)?;

    #[allow(clippy::cast_possible_truncation)]
    let (k, n) = (threshold as u8, total as u8);
    let (first, second) = key.split_at(HALF_KEY);

    let first = gf256::split_bytes_with_rng(rng, first, k, n);
    let second = gf256::split_bytes_with_rng(rng, second, k, n);

    let shares = first
        .into_iter()
        .zip(second)
        .map(|((index, mut half_1), (_, mut half_2))| {
            let mut payload = Vec::with_capacity(KEY_SIZE);
            payload.extend_from_slice(&half_1);
            payload.extend_from_slice(&half_2);
            half_1.zeroize();
            half_2.zeroize();
            KeyShare::new(index, payload)
        })
        .collect();

    tracing::debug!(threshold, total, "split envelope key");
    Ok(shares)
}

/// Recover a key from shares.
///
/// The threshold is not known here: passing fewer shares than were required
/// at split time yields a wrong key, which the envelope tag check rejects.
///
/// # Errors
///
/// Returns a validation error for an empty set, a payload that is not
/// 32 bytes, index 0, or a repeated index.
pub fn combine_key(shares: &[KeyShare]) -> ShardResult<EnvelopeKey> {
    if shares.is_empty() {
        return Err(ShardError::NoShares);
    }
    if let Some(bad) = shares.iter().find(|s| s.payload.len() != KEY_SIZE) {
        return Err(ShardError::InvalidShareLength {
            expected: KEY_SIZE,
            actual: bad.payload.len(),
        });
    }

    let first: Vec<(u8, &[u8])> = shares
        .iter()
        .map(|s| (s.index, &s.payload[..HALF_KEY]))
        .collect();
    let second: Vec<(u8, &[u8])> = shares
        .iter()
        .map(|s| (s.index, &s.payload[HALF_KEY..]))
        .collect();

    let mut half_1 = gf256::reconstruct_bytes(&first)?;
    let mut half_2 = gf256::reconstruct_bytes(&second)?;

    let mut bytes = [0u8; KEY_SIZE];
    bytes[..HALF_KEY].copy_from_slice(&half_1);
    bytes[HALF_KEY..].copy_from_slice(&half_2);
    half_1.zeroize();
    half_2.zeroize();

    let key = EnvelopeKey::from_bytes(bytes);
    bytes.zeroize();
    Ok(key)
}

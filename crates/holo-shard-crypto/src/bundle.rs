//! Encrypt-then-split pipeline.
//!
//! A payload is sealed under a fresh random key and only the key is shared;
//! the envelope itself can be stored anywhere.

use rand::{CryptoRng, RngCore, rngs::OsRng};

use crate::envelope::{self, EnvelopeKey};
use crate::error::ShardResult;
use crate::key_split::{self, KeyShare};

/// Encrypted payload together with the shares of its key.
#[derive(Clone, Debug)]
pub struct EncryptedBundle {
    /// Envelope blob (`MAGIC || NONCE || TAG || CIPHERTEXT`).
    pub encrypted: Vec<u8>,
    /// Key shares, one per holder.
    pub shares: Vec<KeyShare>,
}

/// Encrypt `payload` under a random key and split that key.
///
/// # Errors
///
/// Returns a validation error for an out-of-range threshold/total pair.
pub fn encrypt_and_split(
    payload: &[u8],
    threshold: usize,
    total: usize,
) -> ShardResult<EncryptedBundle> {
    encrypt_and_split_with_rng(&mut OsRng, payload, threshold, total)
}

/// [`encrypt_and_split`] drawing the key, nonce, and polynomials from `rng`.
///
/// # Errors
///
/// Same as [`encrypt_and_split`].
pub fn encrypt_and_split_with_rng<R: RngCore + CryptoRng>(
    rng: &mut R,
    payload: &[u8],
    threshold: usize,
    total: usize,
) -> ShardResult<EncryptedBundle> {
    key_split::validate_thresholds(threshold, total)?;

    let key = EnvelopeKey::generate_with_rng(rng);
    let encrypted = envelope::encrypt_with_rng(rng, payload, &key)?;
    let shares = key_split::split_key_with_rng(rng, key.as_bytes(), threshold, total)?;

    tracing::info!(
        payload_len = payload.len(),
        threshold,
        total,
        "encrypted payload and split key"
    );
    Ok(EncryptedBundle { encrypted, shares })
}

/// Recover the key from `shares` and decrypt `encrypted`.
///
/// # Errors
///
/// Share validation errors come first, then envelope format errors, then
/// `IntegrityCheckFailed` when the recovered key does not open the envelope
/// (for example because too few shares were supplied).
pub fn reconstruct_and_decrypt(encrypted: &[u8], shares: &[KeyShare]) -> ShardResult<Vec<u8>> {
    let key = key_split::combine_key(shares)?;
    let payload = envelope::decrypt(encrypted, &key)?;
    tracing::info!(shares = shares.len(), "reconstructed key and decrypted payload");
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, ShardError};

    #[test]
    fn roundtrip_with_threshold_subset() {
        let bundle = encrypt_and_split(b"asset administration shell", 3, 5).unwrap();
        assert_eq!(bundle.shares.len(), 5);

        let recovered = reconstruct_and_decrypt(&bundle.encrypted, &bundle.shares[2..5]).unwrap();
        assert_eq!(recovered, b"asset administration shell");
    }

    #[test]
    fn empty_payload_three_of_five() {
        let bundle = encrypt_and_split(b"", 3, 5).unwrap();
        let subset = [
            bundle.shares[0].clone(),
            bundle.shares[2].clone(),
            bundle.shares[4].clone(),
        ];
        assert!(reconstruct_and_decrypt(&bundle.encrypted, &subset)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn too_few_shares_fail_integrity() {
        let bundle = encrypt_and_split(b"payload", 3, 5).unwrap();
        let err = reconstruct_and_decrypt(&bundle.encrypted, &bundle.shares[..2]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Integrity);
    }

    #[test]
    fn invalid_thresholds_rejected_before_encrypting() {
        assert!(matches!(
            encrypt_and_split(b"test", 0, 3),
            Err(ShardError::ThresholdTooSmall)
        ));
        assert!(matches!(
            encrypt_and_split(b"test", 4, 3),
            Err(ShardError::ThresholdExceedsTotal { .. })
        ));
    }

    #[test]
    fn short_share_rejected() {
        let bundle = encrypt_and_split(b"hello", 2, 3).unwrap();
        let bad = [KeyShare::new(
            bundle.shares[0].index(),
            bundle.shares[0].payload()[..8].to_vec(),
        )];
        assert!(matches!(
            reconstruct_and_decrypt(&bundle.encrypted, &bad),
            Err(ShardError::InvalidShareLength { .. })
        ));
    }
}

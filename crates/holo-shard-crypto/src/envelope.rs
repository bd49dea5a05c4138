//! Authenticated encryption envelope (AES-256-GCM, 128-bit nonce).
//!
//! Binary layout:
//!
//! ```text
//! MAGIC (4) || NONCE (16) || TAG (16) || CIPHERTEXT (variable)
//! ```
//!
//! The nonce is drawn fresh for every envelope. No associated data is bound.
//! Decryption either returns the whole verified plaintext or an error.

use aes_gcm::{
    AesGcm,
    aead::{AeadInPlace, KeyInit, consts::U16, generic_array::GenericArray},
    aes::Aes256,
};
use rand::{CryptoRng, RngCore, rngs::OsRng};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{ShardError, ShardResult};

/// Envelope format tag.
pub const MAGIC: &[u8; 4] = b"AHS1";

/// Symmetric key size (256 bits).
pub const KEY_SIZE: usize = 32;

/// Nonce size (128 bits).
pub const NONCE_SIZE: usize = 16;

/// GCM authentication tag size (128 bits).
pub const TAG_SIZE: usize = 16;

/// Fixed header length preceding the ciphertext.
pub const HEADER_LEN: usize = MAGIC.len() + NONCE_SIZE + TAG_SIZE;

type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// 256-bit envelope key, zeroized on drop.
#[derive(Clone, ZeroizeOnDrop)]
pub struct EnvelopeKey {
    bytes: [u8; KEY_SIZE],
}

impl EnvelopeKey {
    /// Create a key from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Generate a random key from the operating system RNG.
    #[must_use]
    pub fn generate() -> Self {
        Self::generate_with_rng(&mut OsRng)
    }

    /// Generate a random key from the given RNG.
    #[must_use]
    pub fn generate_with_rng<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        rng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Try to create a key from a slice.
    ///
    /// # Errors
    ///
    /// Returns an error if the slice is not exactly `KEY_SIZE` bytes.
    pub fn try_from_slice(slice: &[u8]) -> ShardResult<Self> {
        let bytes: [u8; KEY_SIZE] =
            slice
                .try_into()
                .map_err(|_| ShardError::InvalidKeyLength {
                    expected: KEY_SIZE,
                    actual: slice.len(),
                })?;
        Ok(Self { bytes })
    }

    /// Get the key bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for EnvelopeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvelopeKey").finish_non_exhaustive()
    }
}

/// Parsed envelope: nonce, tag, and ciphertext.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    nonce: [u8; NONCE_SIZE],
    tag: [u8; TAG_SIZE],
    ciphertext: Vec<u8>,
}

impl Envelope {
    /// Nonce used for this envelope.
    #[must_use]
    pub const fn nonce(&self) -> &[u8; NONCE_SIZE] {
        &self.nonce
    }

    /// Detached authentication tag.
    #[must_use]
    pub const fn tag(&self) -> &[u8; TAG_SIZE] {
        &self.tag
    }

    /// Ciphertext bytes (same length as the plaintext).
    #[must_use]
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Pack into `MAGIC || NONCE || TAG || CIPHERTEXT`.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.ciphertext.len());
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.tag);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Unpack an envelope blob.
    ///
    /// # Errors
    ///
    /// Returns `EnvelopeTooShort` if the blob is shorter than the header and
    /// `BadMagic` if it does not start with [`MAGIC`].
    pub fn from_bytes(blob: &[u8]) -> ShardResult<Self> {
        if blob.len() < HEADER_LEN {
            return Err(ShardError::EnvelopeTooShort {
                expected: HEADER_LEN,
                actual: blob.len(),
            });
        }
        let (magic, rest) = blob.split_at(MAGIC.len());
        if magic != MAGIC {
            return Err(ShardError::BadMagic);
        }
        let (nonce, rest) = rest.split_at(NONCE_SIZE);
        let (tag, ciphertext) = rest.split_at(TAG_SIZE);

        let mut envelope = Self {
            nonce: [0u8; NONCE_SIZE],
            tag: [0u8; TAG_SIZE],
            ciphertext: ciphertext.to_vec(),
        };
        envelope.nonce.copy_from_slice(nonce);
        envelope.tag.copy_from_slice(tag);
        Ok(envelope)
    }
}

/// Encrypt `payload` under `key` with a fresh OS-random nonce.
///
/// # Errors
///
/// Returns `PayloadTooLarge` if the payload exceeds the GCM message limit.
pub fn encrypt(payload: &[u8], key: &EnvelopeKey) -> ShardResult<Vec<u8>> {
    encrypt_with_rng(&mut OsRng, payload, key)
}

/// Encrypt `payload` under `key`, drawing the nonce from `rng`.
///
/// # Errors
///
/// Returns `PayloadTooLarge` if the payload exceeds the GCM message limit.
pub fn encrypt_with_rng<R: RngCore + CryptoRng>(
    rng: &mut R,
    payload: &[u8],
    key: &EnvelopeKey,
) -> ShardResult<Vec<u8>> {
    let mut nonce = [0u8; NONCE_SIZE];
    rng.fill_bytes(&mut nonce);

    let cipher = Aes256Gcm16::new(key.as_bytes().into());
    let mut buffer = payload.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(GenericArray::from_slice(&nonce), b"", &mut buffer)
        .map_err(|_| ShardError::PayloadTooLarge)?;

    let mut envelope = Envelope {
        nonce,
        tag: [0u8; TAG_SIZE],
        ciphertext: buffer,
    };
    envelope.tag.copy_from_slice(&tag);

    tracing::debug!(
        payload_len = payload.len(),
        envelope_len = HEADER_LEN + envelope.ciphertext.len(),
        "sealed envelope"
    );
    Ok(envelope.to_bytes())
}

/// Decrypt and verify an envelope blob.
///
/// # Errors
///
/// Returns a format error if the blob cannot be unpacked and
/// `IntegrityCheckFailed` if the tag does not verify under `key`.
pub fn decrypt(blob: &[u8], key: &EnvelopeKey) -> ShardResult<Vec<u8>> {
    let envelope = Envelope::from_bytes(blob)?;

    let cipher = Aes256Gcm16::new(key.as_bytes().into());
    let mut buffer = envelope.ciphertext;
    if cipher
        .decrypt_in_place_detached(
            GenericArray::from_slice(&envelope.nonce),
            b"",
            &mut buffer,
            GenericArray::from_slice(&envelope.tag),
        )
        .is_err()
    {
        buffer.zeroize();
        return Err(ShardError::IntegrityCheckFailed);
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn roundtrip() {
        let key = EnvelopeKey::generate();
        let blob = encrypt(b"hello world", &key).unwrap();
        assert_eq!(decrypt(&blob, &key).unwrap(), b"hello world");
    }

    #[test]
    fn empty_payload() {
        let key = EnvelopeKey::generate();
        let blob = encrypt(b"", &key).unwrap();
        assert_eq!(blob.len(), HEADER_LEN);
        assert!(decrypt(&blob, &key).unwrap().is_empty());
    }

    #[test]
    fn layout_offsets() {
        let key = EnvelopeKey::from_bytes([7u8; KEY_SIZE]);
        let blob = encrypt(b"payload", &key).unwrap();

        assert_eq!(&blob[..4], MAGIC);
        assert_eq!(blob.len(), HEADER_LEN + b"payload".len());

        let envelope = Envelope::from_bytes(&blob).unwrap();
        assert_eq!(envelope.nonce(), &blob[4..20]);
        assert_eq!(envelope.tag(), &blob[20..36]);
        assert_eq!(envelope.ciphertext(), &blob[36..]);
        assert_eq!(envelope.to_bytes(), blob);
    }

    #[test]
    fn fresh_nonce_per_envelope() {
        let key = EnvelopeKey::generate();
        let a = Envelope::from_bytes(&encrypt(b"same", &key).unwrap()).unwrap();
        let b = Envelope::from_bytes(&encrypt(b"same", &key).unwrap()).unwrap();
        assert_ne!(a.nonce(), b.nonce());
        assert_ne!(a.ciphertext(), b.ciphertext());
    }

    #[test]
    fn same_rng_produces_same_envelope() {
        let key = EnvelopeKey::from_bytes([1u8; KEY_SIZE]);
        let a = encrypt_with_rng(&mut ChaCha20Rng::from_seed([9; 32]), b"x", &key).unwrap();
        let b = encrypt_with_rng(&mut ChaCha20Rng::from_seed([9; 32]), b"x", &key).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn wrong_key_fails() {
        let blob = encrypt(b"secret", &EnvelopeKey::generate()).unwrap();
        let err = decrypt(&blob, &EnvelopeKey::generate()).unwrap_err();
        assert!(matches!(err, ShardError::IntegrityCheckFailed));
        assert_eq!(err.kind(), ErrorKind::Integrity);
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let key = EnvelopeKey::generate();
        let mut blob = encrypt(b"secret", &key).unwrap();
        blob[HEADER_LEN] ^= 0x01;
        assert!(matches!(
            decrypt(&blob, &key),
            Err(ShardError::IntegrityCheckFailed)
        ));
    }

    #[test]
    fn tampered_tag_fails() {
        let key = EnvelopeKey::generate();
        let mut blob = encrypt(b"secret", &key).unwrap();
        blob[HEADER_LEN - 1] ^= 0x80;
        assert!(matches!(
            decrypt(&blob, &key),
            Err(ShardError::IntegrityCheckFailed)
        ));
    }

    #[test]
    fn tampered_nonce_fails() {
        let key = EnvelopeKey::generate();
        let mut blob = encrypt(b"secret", &key).unwrap();
        blob[MAGIC.len()] ^= 0x10;
        assert!(matches!(
            decrypt(&blob, &key),
            Err(ShardError::IntegrityCheckFailed)
        ));
    }

    #[test]
    fn short_blob_is_format_error() {
        let key = EnvelopeKey::generate();
        let err = decrypt(&[0u8; HEADER_LEN - 1], &key).unwrap_err();
        assert!(matches!(
            err,
            ShardError::EnvelopeTooShort {
                expected: HEADER_LEN,
                actual: 35
            }
        ));
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn bad_magic_is_format_error() {
        let key = EnvelopeKey::generate();
        let mut blob = encrypt(b"secret", &key).unwrap();
        blob[0] = b'X';
        assert!(matches!(decrypt(&blob, &key), Err(ShardError::BadMagic)));
    }

    #[test]
    fn key_from_slice_checks_length() {
        assert!(EnvelopeKey::try_from_slice(&[0u8; KEY_SIZE]).is_ok());
        assert!(matches!(
            EnvelopeKey::try_from_slice(&[0u8; 31]),
            Err(ShardError::InvalidKeyLength {
                expected: 32,
                actual: 31
            })
        ));
    }

    #[test]
    fn key_debug_redacts() {
        let key = EnvelopeKey::from_bytes([0xAB; KEY_SIZE]);
        let debug = format!("{key:?}");
        assert!(!debug.contains("171"));
        assert!(!debug.to_lowercase().contains("ab, "));
    }
}

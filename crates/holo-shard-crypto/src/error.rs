//! Error types for secret splitting, reconstruction, and envelope handling.

use thiserror::Error;

/// Coarse classification of a [`ShardError`].
///
/// Callers that only need to decide how to report a failure (bad input, bad
/// blob, failed authentication, undecodable secret) match on this instead of
/// the individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid parameters, lengths, or share shapes.
    Validation,
    /// A blob or share string is not in the recognized layout.
    Format,
    /// Authenticated decryption rejected the envelope.
    Integrity,
    /// A reconstructed secret could not be decoded as text.
    Decode,
}

/// Errors that can occur while splitting, combining, encrypting, or decoding.
#[derive(Debug, Error)]
pub enum ShardError {
    /// Threshold must be at least 1.
    #[error("threshold must be at least 1")]
    ThresholdTooSmall,

    /// Total share count must be at least 1.
    #[error("total shares must be at least 1")]
    TotalTooSmall,

    /// Threshold cannot exceed the total number of shares.
    #[error("threshold ({threshold}) cannot exceed total shares ({total})")]
    ThresholdExceedsTotal {
        /// The requested threshold.
        threshold: usize,
        /// The requested total.
        total: usize,
    },

    /// Total share count exceeds what the share index can address.
    #[error("total shares ({total}) cannot exceed {max}")]
    TooManyShares {
        /// The requested total.
        total: usize,
        /// The largest supported total.
        max: usize,
    },

    /// Symmetric key has the wrong length.
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes.
        expected: usize,
        /// Actual key length provided.
        actual: usize,
    },

    /// Share payload has the wrong length.
    #[error("invalid share payload length: expected {expected}, got {actual}")]
    InvalidShareLength {
        /// Expected payload length in bytes.
        expected: usize,
        /// Actual payload length provided.
        actual: usize,
    },

    /// Share index 0 is the evaluation point of the secret itself.
    #[error("share index 0 is reserved")]
    ReservedIndex,

    /// Two shares carry the same evaluation point.
    #[error("duplicate share index: {0}")]
    DuplicateIndex(u32),

    /// Shares in one reconstruction must have equal payload lengths.
    #[error("share lengths must match")]
    MismatchedLengths,

    /// Reconstruction was called with no shares.
    #[error("at least one share is required")]
    NoShares,

    /// Secret integer does not fit below the field modulus.
    #[error("secret is too large for the prime field")]
    SecretTooLarge,

    /// Value has no multiplicative inverse modulo the field prime.
    #[error("value has no inverse modulo the field prime")]
    NotInvertible,

    /// Payload exceeds what the cipher can encrypt under one nonce.
    #[error("payload too large to encrypt")]
    PayloadTooLarge,

    /// Envelope is shorter than its fixed header.
    #[error("encrypted payload is too short: expected at least {expected} bytes, got {actual}")]
    EnvelopeTooShort {
        /// Minimum envelope length (the header).
        expected: usize,
        /// Actual blob length.
        actual: usize,
    },

    /// Envelope does not start with the format tag.
    #[error("encrypted payload missing magic header")]
    BadMagic,

    /// A string is not a field share in text form.
    #[error("not a shard string: {reason}")]
    MalformedShare {
        /// What part of the shape did not match.
        reason: &'static str,
    },

    /// Authentication tag did not verify.
    #[error("decryption failed: ciphertext was tampered with or the key is wrong")]
    IntegrityCheckFailed,

    /// Reconstructed secret bytes are not UTF-8.
    #[error("reconstructed secret is not valid UTF-8")]
    InvalidUtf8,
}

impl ShardError {
    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ThresholdTooSmall
            | Self::TotalTooSmall
            | Self::ThresholdExceedsTotal { .. }
            | Self::TooManyShares { .. }
            | Self::InvalidKeyLength { .. }
            | Self::InvalidShareLength { .. }
            | Self::ReservedIndex
            | Self::DuplicateIndex(_)
            | Self::MismatchedLengths
            | Self::NoShares
            | Self::SecretTooLarge
            | Self::NotInvertible
            | Self::PayloadTooLarge => ErrorKind::Validation,
            Self::EnvelopeTooShort { .. } | Self::BadMagic | Self::MalformedShare { .. } => {
                ErrorKind::Format
            }
            Self::IntegrityCheckFailed => ErrorKind::Integrity,
            Self::InvalidUtf8 => ErrorKind::Decode,
        }
    }
}

/// Result type alias for shard operations.
pub type ShardResult<T> = Result<T, ShardError>;

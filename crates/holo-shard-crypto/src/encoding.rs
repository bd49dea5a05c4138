//! String secrets as field integers, and the text form of field shares.
//!
//! A string maps to the big-endian integer of its UTF-8 bytes. The reverse
//! uses the minimal byte length, so a leading zero byte does not survive
//! the round trip.
//!
//! Shares are embedded in documents as `SHARD_V1:<index>:<value>` with both
//! numbers in plain decimal.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::Zero;
use rand::{CryptoRng, RngCore, rngs::OsRng};

use crate::error::{ShardError, ShardResult};
use crate::field;
use crate::polynomial::{self, FieldShare};

/// Tag that starts every share string.
pub const SHARD_PREFIX: &str = "SHARD_V1";

/// Interpret the UTF-8 bytes of `value` as a big-endian integer.
#[must_use]
pub fn str_to_int(value: &str) -> BigUint {
    BigUint::from_bytes_be(value.as_bytes())
}

/// Inverse of [`str_to_int`]; zero maps to the empty string.
///
/// # Errors
///
/// Returns `InvalidUtf8` if the minimal big-endian bytes are not UTF-8.
pub fn int_to_str(value: &BigUint) -> ShardResult<String> {
    if value.is_zero() {
        return Ok(String::new());
    }
    String::from_utf8(value.to_bytes_be()).map_err(|_| ShardError::InvalidUtf8)
}

fn is_decimal(part: &str) -> bool {
    !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for FieldShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SHARD_PREFIX}:{}:{}", self.index(), self.value())
    }
}

impl FromStr for FieldShare {
    type Err = ShardError;

    fn from_str(s: &str) -> ShardResult<Self> {
        let rest = s
            .strip_prefix(SHARD_PREFIX)
            .and_then(|r| r.strip_prefix(':'))
            .ok_or(ShardError::MalformedShare {
                reason: "missing SHARD_V1 prefix",
            })?;

        let mut fields = rest.split(':');
        let (Some(index), Some(value), None) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(ShardError::MalformedShare {
                reason: "expected three colon-separated fields",
            });
        };

        if !is_decimal(index) {
            return Err(ShardError::MalformedShare {
                reason: "index is not a decimal integer",
            });
        }
        let index: u32 = index.parse().map_err(|_| ShardError::MalformedShare {
            reason: "index out of range",
        })?;
        if index == 0 {
            return Err(ShardError::MalformedShare {
                reason: "index 0 is reserved",
            });
        }

        if !is_decimal(value) {
            return Err(ShardError::MalformedShare {
                reason: "value is not a decimal integer",
            });
        }
        let value =
            BigUint::parse_bytes(value.as_bytes(), 10).ok_or(ShardError::MalformedShare {
                reason: "value is not a decimal integer",
            })?;

        Ok(Self::new(index, value))
    }
}

/// Probe a free-text value for a share; anything else is `None`.
#[must_use]
pub fn parse_shard(raw: &str) -> Option<FieldShare> {
    raw.parse().ok()
}

/// Split a string secret into `n` text-embeddable shares with threshold `k`.
///
/// # Errors
///
/// Returns `SecretTooLarge` if the encoded string does not fit the field,
/// or a threshold validation error.
pub fn split_string(secret: &str, n: usize, k: usize) -> ShardResult<Vec<FieldShare>> {
    split_string_with_rng(&mut OsRng, secret, n, k)
}

/// [`split_string`] drawing the coefficients from `rng`.
///
/// # Errors
///
/// Same as [`split_string`].
pub fn split_string_with_rng<R: RngCore + CryptoRng>(
    rng: &mut R,
    secret: &str,
    n: usize,
    k: usize,
) -> ShardResult<Vec<FieldShare>> {
    let secret_int = str_to_int(secret);
    if &secret_int >= field::modulus() {
        return Err(ShardError::SecretTooLarge);
    }
    polynomial::make_shards_with_rng(rng, &secret_int, n, k)
}

/// Recover a string secret from field shares.
///
/// # Errors
///
/// Returns recovery validation errors, or `InvalidUtf8` when the recovered
/// integer is not text (typically a wrong or insufficient share set).
pub fn recover_string(shares: &[FieldShare]) -> ShardResult<String> {
    int_to_str(&polynomial::recover_secret(shares)?)
}

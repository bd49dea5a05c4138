//! Threshold sharing of an integer secret over the prime field.
//!
//! The secret is the constant term of a random polynomial of degree `k − 1`
//! with coefficients uniform in `[0, p)`. Shares are the evaluations at
//! `x = 1..=n`; any `k` of them determine the polynomial and therefore
//! `f(0)`.
//!
//! # Example
//!
//! ```rust
//! use holo_shard_crypto::polynomial::{make_shards, recover_secret};
//! use num_bigint::BigUint;
//!
//! let secret = BigUint::from(424_242u32);
//! let shards = make_shards(&secret, 5, 3).unwrap();
//!
//! assert_eq!(recover_secret(&shards[..3]).unwrap(), secret);
//! assert_eq!(recover_secret(&shards[2..]).unwrap(), secret);
//! ```

use std::collections::HashSet;

use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore, rngs::OsRng};

use crate::error::{ShardError, ShardResult};
use crate::field;

/// One evaluation point `(x, f(x))` of the sharing polynomial.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FieldShare {
    index: u32,
    value: BigUint,
}

impl FieldShare {
    /// Create a share. Index 0 is rejected later by [`recover_secret`].
    #[must_use]
    pub fn new(index: u32, value: BigUint) -> Self {
        Self { index, value }
    }

    /// Share index (x-coordinate).
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Share value (y-coordinate).
    #[must_use]
    pub const fn value(&self) -> &BigUint {
        &self.value
    }
}

impl std::fmt::Debug for FieldShare {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldShare")
            .field("index", &self.index)
            .field("bits", &self.value.bits())
            .field("value", &"[redacted]")
            .finish()
    }
}

/// Horner evaluation mod p.
fn eval_poly(coefficients: &[BigUint], x: &BigUint) -> BigUint {
    coefficients
        .iter()
        .rev()
        .fold(BigUint::zero(), |acc, coeff| {
            field::add(&field::mul(&acc, x), coeff)
        })
}

/// Split `secret` into `n` shares with threshold `k`.
///
/// # Errors
///
/// Returns a validation error unless `1 <= k <= n` and `secret < p`.
pub fn make_shards(secret: &BigUint, n: usize, k: usize) -> ShardResult<Vec<FieldShare>> {
    make_shards_with_rng(&mut OsRng, secret, n, k)
}

/// [`make_shards`] drawing the coefficients from `rng`.
///
/// # Errors
///
/// Same as [`make_shards`].
pub fn make_shards_with_rng<R: RngCore + CryptoRng>(
    rng: &mut R,
    secret: &BigUint,
    n: usize,
    k: usize,
) -> ShardResult<Vec<FieldShare>> {
    if k < 1 {
        return Err(ShardError::ThresholdTooSmall);
    }
    if n < 1 {
        return Err(ShardError::TotalTooSmall);
    }
    if k > n {
        return Err(ShardError::ThresholdExceedsTotal {
            threshold: k,
            total: n,
        });
    }
    let max = usize::try_from(u32::MAX).unwrap_or(usize::MAX);
    if n > max {
        return Err(ShardError::TooManyShares { total: n, max });
    }
    let p = field::modulus();
    if secret >= p {
        return Err(ShardError::SecretTooLarge);
    }

    let mut poly = Vec::with_capacity(k);
    poly.push(secret.clone());
    poly.extend((1..k).map(|_| rng.gen_biguint_below(p)));

    let shares = (1..=n)
        .map(|x| {
            #[allow(clippy::cast_possible_truncation)]
            let index = x as u32;
            FieldShare::new(index, eval_poly(&poly, &BigUint::from(index)))
        })
        .collect();

    tracing::debug!(n, k, "generated field shards");
    Ok(shares)
}

/// Recover the secret as `f(0)` by Lagrange interpolation.
///
/// The original threshold is not checked. Fewer shares than it return a
/// well-formed integer that is not the secret.
///
/// # Errors
///
/// Returns a validation error for an empty set, index 0, or a repeated
/// index.
pub fn recover_secret(shares: &[FieldShare]) -> ShardResult<BigUint> {
    if shares.is_empty() {
        return Err(ShardError::NoShares);
    }

    let mut seen = HashSet::with_capacity(shares.len());
    for share in shares {
        if share.index == 0 {
            return Err(ShardError::ReservedIndex);
        }
        if !seen.insert(share.index) {
            return Err(ShardError::DuplicateIndex(share.index));
        }
    }

    let xs: Vec<BigUint> = shares.iter().map(|s| BigUint::from(s.index)).collect();
    let mut secret = BigUint::zero();

    for (j, share) in shares.iter().enumerate() {
        let mut numerator = BigUint::one();
        let mut denominator = BigUint::one();
        for (m, x_m) in xs.iter().enumerate() {
            if m == j {
                continue;
            }
            numerator = field::mul(&numerator, &field::neg(x_m));
            denominator = field::mul(&denominator, &field::sub(&xs[j], x_m));
        }
        let basis = field::mul(&numerator, &field::mod_inverse(&denominator)?);
        secret = field::add(&secret, &field::mul(&field::reduce(&share.value), &basis));
    }

    Ok(secret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn deterministic_rng() -> ChaCha20Rng {
        ChaCha20Rng::from_seed([0x21; 32])
    }

    #[test]
    fn eval_poly_known_values() {
        // f(x) = 3 + 2x + x^2
        let coeffs = [3u32, 2, 1].map(BigUint::from);
        assert_eq!(eval_poly(&coeffs, &BigUint::from(0u32)), BigUint::from(3u32));
        assert_eq!(eval_poly(&coeffs, &BigUint::from(4u32)), BigUint::from(27u32));
    }

    #[test]
    fn eval_poly_reduces_mod_p() {
        let p_minus_one = field::modulus() - BigUint::one();
        // f(x) = (p-1) + (p-1)x, f(1) = 2p - 2 ≡ p - 2
        let coeffs = [p_minus_one.clone(), p_minus_one];
        assert_eq!(
            eval_poly(&coeffs, &BigUint::one()),
            field::modulus() - BigUint::from(2u32)
        );
    }

    #[test]
    fn indices_run_one_to_n() {
        let shards = make_shards(&BigUint::from(9u32), 4, 2).unwrap();
        let indices: Vec<u32> = shards.iter().map(FieldShare::index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4]);
    }

    #[test]
    fn every_pair_of_three_recovers() {
        let secret = BigUint::from(0x6865_6c6c_6fu64);
        let shards = make_shards_with_rng(&mut deterministic_rng(), &secret, 3, 2).unwrap();
        for (a, b) in [(0, 1), (0, 2), (1, 2), (2, 0)] {
            let subset = [shards[a].clone(), shards[b].clone()];
            assert_eq!(recover_secret(&subset).unwrap(), secret);
        }
    }

    #[test]
    fn threshold_one_every_share_is_secret() {
        let secret = BigUint::from(77u32);
        for shard in make_shards(&secret, 3, 1).unwrap() {
            assert_eq!(shard.value(), &secret);
        }
    }

    #[test]
    fn largest_secret_recovers() {
        let secret = field::modulus() - BigUint::one();
        let shards = make_shards(&secret, 5, 5).unwrap();
        assert_eq!(recover_secret(&shards).unwrap(), secret);
    }

    #[test]
    fn zero_secret_recovers() {
        let shards = make_shards(&BigUint::zero(), 3, 2).unwrap();
        assert!(recover_secret(&shards[1..]).unwrap().is_zero());
    }

    #[test]
    fn rejects_secret_at_or_above_modulus() {
        let p = field::modulus();
        assert!(matches!(
            make_shards(p, 3, 2),
            Err(ShardError::SecretTooLarge)
        ));
        assert!(matches!(
            make_shards(&(p + BigUint::one()), 3, 2),
            Err(ShardError::SecretTooLarge)
        ));
    }

    #[test]
    fn rejects_bad_parameters() {
        let s = BigUint::from(1u32);
        assert!(matches!(make_shards(&s, 3, 0), Err(ShardError::ThresholdTooSmall)));
        assert!(matches!(make_shards(&s, 0, 1), Err(ShardError::TotalTooSmall)));
        assert!(matches!(
            make_shards(&s, 2, 3),
            Err(ShardError::ThresholdExceedsTotal {
                threshold: 3,
                total: 2
            })
        ));
    }

    #[test]
    fn fewer_than_threshold_is_wrong_but_well_formed() {
        let secret = BigUint::from(123_456u32);
        let shards = make_shards_with_rng(&mut deterministic_rng(), &secret, 5, 3).unwrap();
        let recovered = recover_secret(&shards[..2]).unwrap();
        assert_ne!(recovered, secret);
        assert!(&recovered < field::modulus());
    }

    #[test]
    fn recover_errors() {
        assert!(matches!(recover_secret(&[]), Err(ShardError::NoShares)));
        assert!(matches!(
            recover_secret(&[FieldShare::new(0, BigUint::one())]),
            Err(ShardError::ReservedIndex)
        ));
        assert!(matches!(
            recover_secret(&[
                FieldShare::new(2, BigUint::one()),
                FieldShare::new(2, BigUint::from(5u32)),
            ]),
            Err(ShardError::DuplicateIndex(2))
        ));
    }

    #[test]
    fn same_rng_produces_same_shards() {
        let secret = BigUint::from(5u32);
        let a = make_shards_with_rng(&mut deterministic_rng(), &secret, 4, 3).unwrap();
        let b = make_shards_with_rng(&mut deterministic_rng(), &secret, 4, 3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn debug_redacts_value() {
        let share = FieldShare::new(1, BigUint::from(987_654_321u32));
        let debug = format!("{share:?}");
        assert!(debug.contains("[redacted]"));
        assert!(!debug.contains("987654321"));
    }
}

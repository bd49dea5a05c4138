//! Arithmetic modulo the Mersenne prime 2^521 − 1.

use std::sync::OnceLock;

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};

use crate::error::{ShardError, ShardResult};

/// Exponent of the field modulus `2^521 − 1`.
pub const MERSENNE_EXPONENT: usize = 521;

static MODULUS: OnceLock<BigUint> = OnceLock::new();

/// The field modulus `p = 2^521 − 1`.
pub fn modulus() -> &'static BigUint {
    MODULUS.get_or_init(|| (BigUint::one() << MERSENNE_EXPONENT) - BigUint::one())
}

/// `a mod p`.
#[must_use]
pub fn reduce(a: &BigUint) -> BigUint {
    a % modulus()
}

/// `(a + b) mod p`.
#[must_use]
pub fn add(a: &BigUint, b: &BigUint) -> BigUint {
    (a + b) % modulus()
}

/// `(a − b) mod p`.
#[must_use]
pub fn sub(a: &BigUint, b: &BigUint) -> BigUint {
    let p = modulus();
    ((a % p) + p - (b % p)) % p
}

/// `(a · b) mod p`.
#[must_use]
pub fn mul(a: &BigUint, b: &BigUint) -> BigUint {
    (a * b) % modulus()
}

/// `(−a) mod p`.
#[must_use]
pub fn neg(a: &BigUint) -> BigUint {
    sub(&BigUint::zero(), a)
}

/// Extended Euclid: returns `(g, x, y)` with `a·x + b·y = g = gcd(a, b)`.
fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_x, mut x) = (BigInt::one(), BigInt::zero());
    let (mut old_y, mut y) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let q = &old_r / &r;

        let next_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_x = &old_x - &q * &x;
        old_x = std::mem::replace(&mut x, next_x);

        let next_y = &old_y - &q * &y;
        old_y = std::mem::replace(&mut y, next_y);
    }

    (old_r, old_x, old_y)
}

/// `a^-1 mod p`.
///
/// # Errors
///
/// Returns `NotInvertible` if `a ≡ 0 (mod p)`.
pub fn mod_inverse(a: &BigUint) -> ShardResult<BigUint> {
    let p = BigInt::from_biguint(Sign::Plus, modulus().clone());
    let a = BigInt::from_biguint(Sign::Plus, reduce(a));

    let (g, x, _) = extended_gcd(&a, &p);
    if !g.is_one() {
        return Err(ShardError::NotInvertible);
    }

    let x = ((x % &p) + &p) % &p;
    x.to_biguint().ok_or(ShardError::NotInvertible)
}

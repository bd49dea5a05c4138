//! Byte-wise threshold sharing over GF(2^8).
//!
//! Every byte of the input is the constant term of its own random polynomial
//! of degree `k - 1`; share `i` holds that polynomial evaluated at `x = i`.
//! Field operations are branch-free so timing does not depend on share data.

use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::error::{ShardError, ShardResult};

/// GF(2^8) element, reduced by the AES polynomial x^8 + x^4 + x^3 + x + 1.
#[derive(Clone, Copy, Default, Zeroize)]
struct Gf256(u8);

impl Gf256 {
    const MODULUS: u16 = 0x11B;

    #[inline]
    const fn add(self, other: Self) -> Self {
        Self(self.0 ^ other.0)
    }

    #[inline]
    fn mul(self, other: Self) -> Self {
        let mut a = u16::from(self.0);
        let mut b = u16::from(other.0);
        let mut result: u16 = 0;

        for _ in 0..8 {
            let mask = 0u16.wrapping_sub(b & 1);
            result ^= a & mask;

            let reduce_mask = 0u16.wrapping_sub((a >> 7) & 1);
            a = (a << 1) ^ (Self::MODULUS & reduce_mask);

            b >>= 1;
        }

        #[allow(clippy::cast_possible_truncation)]
        Self(result as u8)
    }

    /// a^254 = a^-1 for non-zero a; maps 0 to 0.
    #[inline]
    fn inv(self) -> Self {
        let a2 = self.mul(self);
        let a4 = a2.mul(a2);
        let a8 = a4.mul(a4);
        let a16 = a8.mul(a8);
        let a32 = a16.mul(a16);
        let a64 = a32.mul(a32);
        let a128 = a64.mul(a64);

        a128.mul(a64).mul(a32).mul(a16).mul(a8).mul(a4).mul(a2)
    }

    #[inline]
    fn div(self, other: Self) -> Self {
        self.mul(other.inv())
    }
}

/// Horner evaluation of `coefficients[0] + coefficients[1]·x + ...`.
fn poly_eval(coefficients: &[Gf256], x: Gf256) -> Gf256 {
    coefficients
        .iter()
        .rev()
        .fold(Gf256(0), |acc, coeff| acc.mul(x).add(*coeff))
}

/// f(0) from points on f, where deg f < points.len().
///
/// In characteristic 2, `0 - x_j = x_j` and `x_i - x_j = x_i ^ x_j`.
fn lagrange_at_zero(points: &[(Gf256, Gf256)]) -> Gf256 {
    let mut result = Gf256(0);
    for (i, &(x_i, y_i)) in points.iter().enumerate() {
        let mut basis = Gf256(1);
        for (j, &(x_j, _)) in points.iter().enumerate() {
            if i != j {
                basis = basis.mul(x_j.div(x_i.add(x_j)));
            }
        }
        result = result.add(y_i.mul(basis));
    }
    result
}

/// Split `secret` into `n` byte strings, any `k` of which recover it.
///
/// Returns `(index, data)` pairs for indices `1..=n`. Parameters must already
/// be validated (`1 <= k <= n <= 255`).
pub(crate) fn split_bytes_with_rng<R: RngCore + CryptoRng>(
    rng: &mut R,
    secret: &[u8],
    k: u8,
    n: u8,
) -> Vec<(u8, Vec<u8>)> {
    debug_assert!(k >= 1 && k <= n);

    let mut outputs: Vec<(u8, Vec<u8>)> = (1..=n)
        .map(|index| (index, Vec::with_capacity(secret.len())))
        .collect();

    let mut poly = vec![Gf256(0); usize::from(k)];
    let mut random = vec![0u8; usize::from(k) - 1];

    for &byte in secret {
        rng.fill_bytes(&mut random);
        poly[0] = Gf256(byte);
        for (coeff, &r) in poly[1..].iter_mut().zip(random.iter()) {
            *coeff = Gf256(r);
        }

        for (index, data) in &mut outputs {
            data.push(poly_eval(&poly, Gf256(*index)).0);
        }
    }

    poly.zeroize();
    random.zeroize();
    outputs
}

/// Recover the secret from `(index, data)` pairs.
///
/// # Errors
///
/// Returns an error for an empty set, index 0, a repeated index, or
/// data strings of unequal length.
pub(crate) fn reconstruct_bytes(shares: &[(u8, &[u8])]) -> ShardResult<Vec<u8>> {
    let Some(&(_, first)) = shares.first() else {
        return Err(ShardError::NoShares);
    };

    let mut seen = [false; 256];
    for &(index, _) in shares {
        if index == 0 {
            return Err(ShardError::ReservedIndex);
        }
        if seen[usize::from(index)] {
            return Err(ShardError::DuplicateIndex(u32::from(index)));
        }
        seen[usize::from(index)] = true;
    }

    let secret_len = first.len();
    if shares.iter().any(|(_, data)| data.len() != secret_len) {
        return Err(ShardError::MismatchedLengths);
    }

    let mut points: Vec<(Gf256, Gf256)> = Vec::with_capacity(shares.len());
    let mut secret = Vec::with_capacity(secret_len);
    for byte_idx in 0..secret_len {
        points.clear();
        points.extend(
            shares
                .iter()
                .map(|&(index, data)| (Gf256(index), Gf256(data[byte_idx]))),
        );
        secret.push(lagrange_at_zero(&points).0);
    }
    for (x, y) in &mut points {
        x.zeroize();
        y.zeroize();
    }

    Ok(secret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn rng() -> ChaCha20Rng {
        ChaCha20Rng::from_seed([0x42; 32])
    }

    fn borrow(shares: &[(u8, Vec<u8>)]) -> Vec<(u8, &[u8])> {
        shares.iter().map(|(i, d)| (*i, d.as_slice())).collect()
    }

    #[test]
    fn add_is_xor() {
        assert_eq!(Gf256(0b1010_1010).add(Gf256(0b1100_1100)).0, 0b0110_0110);
    }

    #[test]
    fn mul_known_value() {
        // FIPS-197 §4.2: {57} • {83} = {c1}
        assert_eq!(Gf256(0x57).mul(Gf256(0x83)).0, 0xC1);
    }

    #[test]
    fn mul_identity_and_zero() {
        assert_eq!(Gf256(42).mul(Gf256(1)).0, 42);
        assert_eq!(Gf256(42).mul(Gf256(0)).0, 0);
    }

    #[test]
    fn every_nonzero_element_has_inverse() {
        for i in 1..=255u8 {
            assert_eq!(Gf256(i).mul(Gf256(i).inv()).0, 1, "inverse failed for {i}");
        }
    }

    #[test]
    fn poly_eval_at_zero_is_constant() {
        let coeffs = [Gf256(7), Gf256(3), Gf256(5)];
        assert_eq!(poly_eval(&coeffs, Gf256(0)).0, 7);
    }

    #[test]
    fn poly_eval_linear() {
        // f(x) = 5 + 3x, so f(2) = 5 ^ (3·2) = 5 ^ 6 = 3
        assert_eq!(poly_eval(&[Gf256(5), Gf256(3)], Gf256(2)).0, 3);
    }

    #[test]
    fn split_then_reconstruct_every_subset() {
        let secret = b"sixteen byte key";
        let shares = split_bytes_with_rng(&mut rng(), secret, 3, 5);
        assert_eq!(shares.len(), 5);

        for a in 0..5 {
            for b in (a + 1)..5 {
                for c in (b + 1)..5 {
                    let picked = [
                        shares[a].clone(),
                        shares[b].clone(),
                        shares[c].clone(),
                    ];
                    let subset = borrow(&picked);
                    assert_eq!(reconstruct_bytes(&subset).unwrap(), secret);
                }
            }
        }
    }

    #[test]
    fn threshold_one_copies_secret() {
        let shares = split_bytes_with_rng(&mut rng(), b"abc", 1, 3);
        for (_, data) in &shares {
            assert_eq!(data, b"abc");
        }
    }

    #[test]
    fn full_index_range() {
        let shares = split_bytes_with_rng(&mut rng(), b"k", 2, 255);
        assert_eq!(shares.last().map(|(i, _)| *i), Some(255));
        let subset = borrow(&shares[253..]);
        assert_eq!(reconstruct_bytes(&subset).unwrap(), b"k");
    }

    #[test]
    fn duplicate_index_rejected() {
        let a = [1u8, 2];
        let b = [3u8, 4];
        let result = reconstruct_bytes(&[(1, &a[..]), (1, &b[..])]);
        assert!(matches!(result, Err(ShardError::DuplicateIndex(1))));
    }

    #[test]
    fn zero_index_rejected() {
        let a = [1u8];
        assert!(matches!(
            reconstruct_bytes(&[(0, &a[..])]),
            Err(ShardError::ReservedIndex)
        ));
    }

    #[test]
    fn mismatched_lengths_rejected() {
        let a = [1u8, 2, 3];
        let b = [4u8, 5];
        assert!(matches!(
            reconstruct_bytes(&[(1, &a[..]), (2, &b[..])]),
            Err(ShardError::MismatchedLengths)
        ));
    }

    #[test]
    fn empty_set_rejected() {
        assert!(matches!(reconstruct_bytes(&[]), Err(ShardError::NoShares)));
    }
}

//! Property-based tests for prime-field sharing and the `SHARD_V1` text form.
//!
//! ## Test Categories
//! 1. **Reconstruction correctness**: any `k` shards recover the secret
//! 2. **Text form**: shards survive `to_string` / `parse_shard`
//! 3. **String secrets**: printable strings round-trip through split/recover
//! 4. **Parser robustness**: arbitrary input never panics

#![allow(clippy::cast_possible_truncation)]

use std::time::Instant;

use holo_shard_crypto::encoding::{parse_shard, recover_string, split_string_with_rng};
use holo_shard_crypto::field;
use holo_shard_crypto::polynomial::{FieldShare, make_shards_with_rng, recover_secret};
use num_bigint::BigUint;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Emit structured JSON log for test results.
fn log_test_result(test_name: &str, phase: &str, details: serde_json::Value, timing_us: u64) {
    let log_entry = serde_json::json!({
        "test": test_name,
        "phase": phase,
        "timing_us": timing_us,
        "result": "success",
        "details": details
    });
    eprintln!("{}", serde_json::to_string(&log_entry).unwrap());
}

// ─────────────────────────────────────────────────────────────────────────────
// Proptest Strategies
// ─────────────────────────────────────────────────────────────────────────────

fn valid_n_k() -> impl Strategy<Value = (usize, usize)> {
    (1usize..=6).prop_flat_map(|k| (k..=k + 4, Just(k)))
}

/// Secrets anywhere in `[0, p)`.
fn field_secret() -> impl Strategy<Value = BigUint> {
    prop::collection::vec(any::<u8>(), 0..=66)
        .prop_map(|bytes| field::reduce(&BigUint::from_bytes_be(&bytes)))
}

fn rng_seed() -> impl Strategy<Value = [u8; 32]> {
    prop::array::uniform32(any::<u8>())
}

// ─────────────────────────────────────────────────────────────────────────────
// Property Tests: Reconstruction Correctness
// ─────────────────────────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// A sliding window of `k` shards recovers the secret.
    #[test]
    fn prop_any_window_recovers_secret(
        secret in field_secret(),
        (n, k) in valid_n_k(),
        seed in rng_seed(),
        offset in 0usize..8,
    ) {
        let start = Instant::now();
        let mut rng = ChaCha20Rng::from_seed(seed);
        let shards = make_shards_with_rng(&mut rng, &secret, n, k).expect("split should succeed");
        prop_assert_eq!(shards.len(), n);

        let offset = offset % (n - k + 1);
        let recovered = recover_secret(&shards[offset..offset + k]).expect("recover should succeed");

        log_test_result("prop_any_window_recovers_secret", "recover", serde_json::json!({
            "n": n,
            "k": k,
            "offset": offset,
            "secret_bits": secret.bits(),
        }), start.elapsed().as_micros() as u64);

        prop_assert_eq!(recovered, secret);
    }

    /// All `n` shards also recover the secret.
    #[test]
    fn prop_all_shards_recover_secret(
        secret in field_secret(),
        (n, k) in valid_n_k(),
        seed in rng_seed(),
    ) {
        let mut rng = ChaCha20Rng::from_seed(seed);
        let shards = make_shards_with_rng(&mut rng, &secret, n, k).expect("split should succeed");
        prop_assert_eq!(recover_secret(&shards).expect("recover should succeed"), secret);
    }

    /// Share values are field elements.
    #[test]
    fn prop_values_below_modulus(
        secret in field_secret(),
        (n, k) in valid_n_k(),
        seed in rng_seed(),
    ) {
        let mut rng = ChaCha20Rng::from_seed(seed);
        for shard in make_shards_with_rng(&mut rng, &secret, n, k).expect("split should succeed") {
            prop_assert!(shard.value() < field::modulus());
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Property Tests: Text Form and String Secrets
// ─────────────────────────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Display and `parse_shard` are inverse for valid shards.
    #[test]
    fn prop_text_form_roundtrip(
        index in 1u32..,
        value in field_secret(),
    ) {
        let shard = FieldShare::new(index, value);
        let text = shard.to_string();
        prop_assert!(text.starts_with("SHARD_V1:"));
        prop_assert_eq!(parse_shard(&text), Some(shard));
    }

    /// Printable strings up to 64 bytes split into text shards and come back.
    #[test]
    fn prop_string_secret_roundtrip(
        secret in "[a-zA-Z0-9 _./-]{1,64}",
        (n, k) in valid_n_k(),
        seed in rng_seed(),
    ) {
        let mut rng = ChaCha20Rng::from_seed(seed);
        let texts: Vec<String> = split_string_with_rng(&mut rng, &secret, n, k)
            .expect("split should succeed")
            .iter()
            .map(ToString::to_string)
            .collect();

        let parsed: Vec<FieldShare> = texts.iter().rev().filter_map(|t| parse_shard(t)).take(k).collect();
        prop_assert_eq!(parsed.len(), k);
        prop_assert_eq!(recover_string(&parsed).expect("recover should succeed"), secret);
    }

    /// The parser never panics and only accepts the exact grammar.
    #[test]
    fn prop_parser_rejects_or_roundtrips(raw in "\\PC{0,40}") {
        if let Some(shard) = parse_shard(&raw) {
            prop_assert!(shard.index() >= 1);
            prop_assert!(raw.starts_with("SHARD_V1:"));
        }
    }

    /// Prefixed but garbled input is rejected.
    #[test]
    fn prop_non_digit_fields_rejected(
        index in "[0-9]{0,3}[a-z+ -][0-9]{0,3}",
        value in "[0-9]{1,8}",
    ) {
        let raw = format!("SHARD_V1:{index}:{value}");
        prop_assert!(parse_shard(&raw).is_none());
    }
}

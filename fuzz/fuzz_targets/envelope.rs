#![no_main]

use holo_shard_crypto::{Envelope, EnvelopeKey, decrypt};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(envelope) = Envelope::from_bytes(data) {
        assert_eq!(envelope.to_bytes(), data);
    }
    let _ = decrypt(data, &EnvelopeKey::from_bytes([0x42; 32]));
});

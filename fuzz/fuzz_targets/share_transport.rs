#![no_main]

use holo_shard_store::{deserialize_share, serialize_share};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(share) = deserialize_share(data) {
        let bytes = serialize_share(&share).expect("serialize decoded share");
        let again = deserialize_share(&bytes).expect("decode re-encoded share");
        assert_eq!(again, share);
    }
});

#![no_main]

use holo_shard_crypto::{FieldShare, parse_shard};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let probed = parse_shard(text);
    let parsed = text.parse::<FieldShare>().ok();
    assert_eq!(probed, parsed);

    // Accepted input renders back to itself.
    if let Some(shard) = probed {
        assert_eq!(shard.to_string().parse::<FieldShare>().ok(), Some(shard));
    }
});

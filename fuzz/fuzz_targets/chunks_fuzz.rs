//! Fuzz test for reply chunking
//!
//! Run with: cargo +nightly fuzz run chunks_fuzz -- -max_total_time=60

#![no_main]

use deskroute_agent::ReplyChunks;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let chunks: Vec<String> = ReplyChunks::new(input).collect();
        assert_eq!(chunks.concat(), input, "chunks must reassemble the reply");
        assert!(chunks.iter().all(|c| !c.is_empty()), "no empty chunks");
    }
});

//! Fuzz test for the reply extractor
//!
//! Any text must extract without panicking, and a parsed ticket must be
//! backed by a `ticket` key inside the braces.
//!
//! Run with: cargo +nightly fuzz run extractor_fuzz -- -max_total_time=60

#![no_main]

use deskroute_agent::{extract, Extraction};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        match extract(input) {
            Extraction::Parsed { .. } => {
                assert!(input.contains('{'), "parsed payload without an opening brace");
                assert!(input.contains("ticket"), "parsed payload without a ticket key");
            }
            Extraction::RawOnly(raw) => {
                assert_eq!(raw, input, "raw fallback must be the input verbatim");
            }
        }
    }
});

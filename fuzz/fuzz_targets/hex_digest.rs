//! Fuzz target for hex digest decoding
//!
//! Arbitrary strings must either decode to a digest that re-encodes to the
//! lowercased input, or be rejected without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use treehash_core::{from_hex, to_hex};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(digest) = from_hex(s) {
            assert_eq!(to_hex(&digest), s.to_ascii_lowercase());
        }
    }
});

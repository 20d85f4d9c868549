//! Fuzz target for the JSON depth pre-scan.
//!
//! The scan must never panic and must never report more levels than there
//! are opening brackets in the input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use safe_deserialize::measure_depth;

fuzz_target!(|data: &[u8]| {
    let depth = measure_depth(data);
    let openers = data.iter().filter(|b| matches!(b, b'{' | b'[')).count();
    assert!(depth <= openers);
});

//! Fuzz target for the guarded JSON pipeline.
//!
//! Arbitrary bytes go through the full preamble (size, destination, depth,
//! unknown fields) in both strict and lenient mode. Any error is fine; a
//! panic or a stack overflow is not.

#![no_main]

use libfuzzer_sys::fuzz_target;
use safe_deserialize::{json, shaped, Options};
use serde::Deserialize;

shaped! {
    #[derive(Debug, Default, Deserialize)]
    pub struct Record {
        pub id: u64,
        pub name: String,
        pub tags: Vec<String>,
        pub child: Option<Box<Record>>,
    }
}

const MAX_INPUT: usize = 64 * 1024;

fuzz_target!(|data: &[u8]| {
    let strict = Options::default().with_max_size(MAX_INPUT).with_max_depth(16);
    let lenient = strict.clone().with_strict_mode(false);

    let mut record = Record::default();
    let _ = json(data, &mut record, &strict);

    let mut record = Record::default();
    let _ = json(data, &mut record, &lenient);
});

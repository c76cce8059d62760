//! Throws arbitrary bytes at `xjson::decode` to confirm it only ever
//! returns `Ok`/`Err` — no panics, no unbounded allocation on malformed
//! input.
#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = xjson::decode(data);
});

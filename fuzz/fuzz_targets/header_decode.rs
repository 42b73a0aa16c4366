//! Fuzz target for MessageHeader decoding
//!
//! Feeds arbitrary byte sequences to the CBOR decoder. Malformed input must
//! only ever produce a decode error, never a panic or over-read.

#![no_main]

use cachet_core::MessageHeader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = ciborium::de::from_reader::<MessageHeader, _>(data);
});

#![no_main]
use libfuzzer_sys::fuzz_target;
use resguard::validate::classify_binary;
use resguard::validate::signatures::BINARY_HEADER;

fuzz_target!(|data: &[u8]| {
    let _ = classify_binary(data);
    // Also drive the scanner past the header check.
    let mut framed = BINARY_HEADER.to_vec();
    framed.extend_from_slice(data);
    let _ = classify_binary(&framed);
});

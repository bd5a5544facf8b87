#![no_main]
use libfuzzer_sys::fuzz_target;
use once_cell::sync::Lazy;
use resguard::validate::{PolicyConfig, TextValidator};

static VALIDATOR: Lazy<TextValidator> =
    Lazy::new(|| TextValidator::new(&PolicyConfig::default()).expect("default policy"));

fuzz_target!(|data: &[u8]| {
    let _ = VALIDATOR.classify_text("user://fuzz.tres", data);
});

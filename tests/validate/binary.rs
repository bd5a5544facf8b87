//! Binary container acceptance, rejection and fallthrough.

use resguard::validate::binary::{classify_binary, scan, BinaryScan};
use resguard::validate::signatures::{BINARY_HEADER, SCRIPT_SIGNATURE};
use resguard::validate::ValidationOutcome;
use resguard::{ResourceSafetyClassifier, ValidatorConfig, Verdict};

use crate::common::test_utils::{binary_container, binary_with_script};

#[test]
fn test_clean_container_is_safe() {
    let data = binary_container(&[0u8; 4096]);
    assert_eq!(classify_binary(&data), ValidationOutcome::Safe);
}

#[test]
fn test_script_marker_at_any_offset_is_unsafe() {
    for offset in [0usize, 1, 2, 63, 64, 1000, 4093] {
        let data = binary_with_script(offset);
        assert_eq!(
            scan(&data),
            BinaryScan::ScriptAt(BINARY_HEADER.len() + offset),
            "offset {offset}"
        );
        assert_eq!(classify_binary(&data), ValidationOutcome::Unsafe);
    }
}

#[test]
fn test_marker_at_end_of_buffer() {
    let data = binary_container(&SCRIPT_SIGNATURE);
    assert_eq!(classify_binary(&data), ValidationOutcome::Unsafe);
}

#[test]
fn test_short_or_mismatched_header_falls_through() {
    assert_eq!(classify_binary(b"RSC"), ValidationOutcome::Unrecognized);
    assert_eq!(classify_binary(b"RSCC\x01\x00"), ValidationOutcome::Unrecognized);
    assert_eq!(classify_binary(b"rscc\x02\x00"), ValidationOutcome::Unrecognized);

    // The classifier then takes the text path, where the signature bytes
    // are not valid UTF-8 and fail closed.
    let classifier = ResourceSafetyClassifier::new(&ValidatorConfig::default()).unwrap();
    let mut not_binary = b"RSCC\x03\x00".to_vec();
    not_binary.extend_from_slice(&SCRIPT_SIGNATURE);
    assert_eq!(classifier.validate("user://x.scn", &not_binary), Verdict::Unsafe);

    let text_like = b"RSCC\x03\x00[gd_resource type=\"Theme\"]";
    assert_eq!(classifier.validate("user://x.scn", text_like), Verdict::Safe);
}

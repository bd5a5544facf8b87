//! Text resource policy over fixture files and hand-written cases.

use resguard::validate::text::{parse_resource_sections, TextValidator};
use resguard::validate::{PolicyConfig, RejectKind, ValidationErrorKind, Verdict};

use crate::common::{sample_file_path, sample_files};
use crate::common::test_data::*;

fn validator() -> TextValidator {
    TextValidator::new(&PolicyConfig::default()).unwrap()
}

#[test]
fn test_good_fixtures_are_safe() {
    let v = validator();
    for path in sample_files("good") {
        let data = std::fs::read(&path).unwrap();
        assert_eq!(
            v.classify_text(&path.to_string_lossy(), &data),
            Verdict::Safe,
            "{}",
            path.display()
        );
    }
}

#[test]
fn test_bad_fixtures_are_unsafe() {
    let v = validator();
    let files = sample_files("bad");
    assert!(!files.is_empty());
    for path in files {
        let data = std::fs::read(&path).unwrap();
        assert_eq!(
            v.classify_text(&path.to_string_lossy(), &data),
            Verdict::Unsafe,
            "{}",
            path.display()
        );
    }
}

#[test]
fn test_rejection_reasons() {
    let v = validator();
    let cases = [
        (BAD_EXTERNAL_SCRIPT, RejectKind::ExternalPath),
        ("bad/inline_gdscript.tres", RejectKind::BlacklistedType),
        (BAD_EMBEDDED_SOURCE, RejectKind::SourceMarker),
        ("bad/parent_escape.tres", RejectKind::ExternalPath),
    ];
    for (file, expected) in cases {
        let data = std::fs::read(sample_file_path(file)).unwrap();
        let rejection = v.inspect(&data).unwrap().expect(file);
        assert_eq!(rejection.kind, expected, "{file}");
    }

    for file in ["bad/duplicate_path.tres", "bad/bracket_in_path.tscn"] {
        let data = std::fs::read(sample_file_path(file)).unwrap();
        let err = v.inspect(&data).unwrap_err();
        assert_eq!(ValidationErrorKind::of(&err), ValidationErrorKind::ParseAnomaly, "{file}");
    }
}

#[test]
fn test_level_sections_in_order() {
    let data = std::fs::read_to_string(sample_file_path(GOOD_LEVEL)).unwrap();
    let sections = parse_resource_sections(&data).unwrap();
    let names: Vec<&str> = sections.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        ["ext_resource", "ext_resource", "sub_resource", "ExtResource"]
    );
    assert_eq!(sections[1].param("path"), Some("res://actors/player.tscn"));
}

#[test]
fn test_case_insensitive_matching() {
    let v = validator();
    let cases: &[&str] = &[
        r#"[EXT_RESOURCE type="Script" path="C:/evil.cs"]"#,
        r#"[Sub_Resource TYPE="gdSCRIPT" id="1"]"#,
        "[resource]\nSCRIPT/SOURCE = \"print(1)\"",
    ];
    for text in cases {
        assert_eq!(v.classify_text("user://c.tres", text.as_bytes()), Verdict::Unsafe, "{text}");
    }
    assert_eq!(
        v.classify_text("user://c.tres", br#"[Ext_Resource type="Texture" path="Res://icon.png"]"#),
        Verdict::Safe
    );
}

#[test]
fn test_decode_failure_fails_closed() {
    let v = validator();
    let err = v.inspect(b"[resource]\n\xc3\x28").unwrap_err();
    assert_eq!(ValidationErrorKind::of(&err), ValidationErrorKind::Decode);

    let utf16 = [0xFF, 0xFE, b'[', 0, b'r', 0];
    assert_eq!(v.classify_text("user://u.tres", &utf16), Verdict::Unsafe);
}

#[test]
fn test_adversarial_inputs_do_not_panic() {
    let v = validator();
    let mut deep = String::new();
    for _ in 0..10_000 {
        deep.push_str("[ext_resource ");
    }
    let inputs: Vec<Vec<u8>> = vec![
        Vec::new(),
        b"[".to_vec(),
        b"]".to_vec(),
        b"[]".to_vec(),
        b"[ext_resource".to_vec(),
        b"[ext_resource path=".to_vec(),
        b"[ext_resource path=\"".to_vec(),
        b"[ext_resource =\"x\"]".to_vec(),
        deep.into_bytes(),
        "[ext_resource path=\"res://\u{0}\"]".as_bytes().to_vec(),
        vec![b'['; 100_000],
    ];
    for input in inputs {
        let _ = v.classify_text("user://fuzz.tres", &input);
    }
}

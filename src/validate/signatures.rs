//! Format signatures, magic numbers and policy defaults.
//!
//! Consolidates the fixed byte signatures and the default name sets used
//! by the binary and text validators and by the load gate.

/// Header of the binary resource container (`RSCC` + version 2).
pub const BINARY_HEADER: [u8; 6] = [0x52, 0x53, 0x43, 0x43, 0x02, 0x00];

/// Marker preceding an embedded compiled-script blob.
pub const SCRIPT_SIGNATURE: [u8; 8] = [0x01, 0x00, 0x00, 0x28, 0xb5, 0x2f, 0xfd, 0x60];

/// URI prefix of the trusted package.
pub const TRUSTED_PREFIX: &str = "res://";

/// Literal marking script source code embedded as a property value.
pub const SOURCE_MARKER: &str = "script/source";

/// Extensions of resource and scene files eligible for interception.
pub const RECOGNIZED_EXTENSIONS: &[&str] = &["tres", "res", "scn", "tscn"];

/// Resource types whose content is runnable code (lower-cased).
pub const TYPE_BLACKLIST: &[&str] = &["script", "gdscript", "csharpscript"];

/// Resource types the loader claims from the host.
pub const HANDLED_TYPES: &[&str] = &[
    "Resource",
    "GDScript",
    "CSharpScript",
    "Script",
    "Scene",
    "PackedScene",
];

/// Check if data starts with the binary container header.
pub fn has_binary_header(data: &[u8]) -> bool {
    data.len() >= BINARY_HEADER.len() && data[..BINARY_HEADER.len()] == BINARY_HEADER
}

//! Path and type recognition for the load gate.

use crate::validate::config::PolicyConfig;

/// True when `path` lies inside the trusted package.
///
/// Host paths are compared exactly: the host only maps the lower-case
/// prefix into the package, so `RES://x` is treated as external.
pub fn is_trusted_path(path: &str, prefix: &str) -> bool {
    path.starts_with(prefix)
}

/// Lower-cased extension of the final path segment, without the dot.
pub fn extension(path: &str) -> Option<String> {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => Some(ext.to_ascii_lowercase()),
        _ => None,
    }
}

/// Whether the gate intercepts `path`: an external file with a
/// recognized resource or scene extension.
pub fn recognize_path(path: &str, policy: &PolicyConfig) -> bool {
    if is_trusted_path(path, &policy.trusted_prefix) {
        return false;
    }
    match extension(path) {
        Some(ext) => policy
            .recognized_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(&ext)),
        None => false,
    }
}

/// Whether the gate claims resources of type `ty` from the host.
pub fn handles_type(ty: &str, policy: &PolicyConfig) -> bool {
    policy.handled_types.iter().any(|t| t == ty)
}

//! Exact substring search over raw byte buffers.
//!
//! An empty needle is never "found": signature checks built on top of this
//! must not fire (or be skipped) because of a degenerate pattern.

use memchr::memmem;

/// Index of the first occurrence of `needle` in `haystack`.
///
/// Returns `None` for an empty needle or when the remaining haystack is
/// shorter than the needle.
pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    memmem::find(haystack, needle)
}

/// Like [`find`], but starting at `offset` and returning an absolute index.
pub fn find_from(haystack: &[u8], needle: &[u8], offset: usize) -> Option<usize> {
    let tail = haystack.get(offset..)?;
    find(tail, needle).map(|i| i + offset)
}

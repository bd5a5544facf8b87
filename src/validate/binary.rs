//! Binary resource container validation.
//!
//! The container is a flat, signature-prefixed stream. Once the header is
//! confirmed, presence of the compiled-script signature anywhere in the
//! body is enough to reject the file; no structural parse is attempted.

use crate::validate::outcome::ValidationOutcome;
use crate::validate::search;
use crate::validate::signatures::{has_binary_header, BINARY_HEADER, SCRIPT_SIGNATURE};
use tracing::debug;

/// What the binary scan found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryScan {
    /// Too short or wrong header; not this format.
    Unrecognized,
    /// Container without an embedded script.
    Clean,
    /// Script signature found at this absolute offset.
    ScriptAt(usize),
}

impl From<BinaryScan> for ValidationOutcome {
    fn from(scan: BinaryScan) -> Self {
        match scan {
            BinaryScan::Unrecognized => ValidationOutcome::Unrecognized,
            BinaryScan::Clean => ValidationOutcome::Safe,
            BinaryScan::ScriptAt(_) => ValidationOutcome::Unsafe,
        }
    }
}

pub fn scan(data: &[u8]) -> BinaryScan {
    if !has_binary_header(data) {
        return BinaryScan::Unrecognized;
    }
    match search::find_from(data, &SCRIPT_SIGNATURE, BINARY_HEADER.len()) {
        Some(offset) => {
            debug!(offset, "Compiled script signature found in binary container");
            BinaryScan::ScriptAt(offset)
        }
        None => BinaryScan::Clean,
    }
}

/// Classify a buffer as a binary container: `Safe`, `Unsafe`, or
/// `Unrecognized` when the header does not match.
pub fn classify_binary(data: &[u8]) -> ValidationOutcome {
    scan(data).into()
}

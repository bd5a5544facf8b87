//! Resource validation engine.
//!
//! Format sniffers, the structural parser for the text format, the
//! binary signature scanner and the policy turning parsed structure into a
//! verdict. Validation is synchronous and stateless; nothing here holds
//! mutable state between calls.

pub mod binary;
pub mod classifier;
pub mod config;
pub mod outcome;
pub mod search;
pub mod signatures;
pub mod text;

pub use binary::classify_binary;
pub use classifier::ResourceSafetyClassifier;
pub use config::{PolicyConfig, ValidatorConfig};
pub use outcome::{
    DetectedFormat, RejectKind, Rejection, ValidationErrorKind, ValidationOutcome,
    ValidationReport, Verdict,
};
pub use text::{ParsedSection, TextValidator};

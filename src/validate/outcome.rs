//! Verdict, reason and report types for validation results.

use crate::error::ResGuardError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Final decision for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// Deserialization may proceed.
    Safe,
    /// The file embeds or references executable code, or could not be
    /// validated with confidence.
    Unsafe,
}

impl Verdict {
    pub fn is_safe(self) -> bool {
        matches!(self, Verdict::Safe)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Safe => write!(f, "Safe"),
            Verdict::Unsafe => write!(f, "Unsafe"),
        }
    }
}

/// Result of a single format validator.
///
/// `Unrecognized` only ever comes out of the binary validator and is
/// consumed by the classifier; callers of the classifier see a [`Verdict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationOutcome {
    Safe,
    Unsafe,
    Unrecognized,
}

/// Why a file was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectKind {
    /// Binary container carries the compiled-script signature.
    EmbeddedScriptBlob,
    /// A resource section points outside the trusted package.
    ExternalPath,
    /// An inline resource declares an executable type.
    BlacklistedType,
    /// Script source text is embedded as a property value.
    SourceMarker,
    /// Text contains no recognizable section (strict mode only).
    Unrecognized,
    /// The input could not be validated; fail closed.
    Error(ValidationErrorKind),
}

/// Standardized failure kinds encountered while validating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    Io,
    Decode,
    ParseAnomaly,
    TooLarge,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ValidationErrorKind::*;
        match self {
            Io => write!(f, "Io"),
            Decode => write!(f, "Decode"),
            ParseAnomaly => write!(f, "ParseAnomaly"),
            TooLarge => write!(f, "TooLarge"),
        }
    }
}

impl ValidationErrorKind {
    /// Map a crate error onto the fail-closed taxonomy.
    pub fn of(err: &ResGuardError) -> Self {
        match err {
            ResGuardError::Io(_) | ResGuardError::Host(_) => ValidationErrorKind::Io,
            ResGuardError::TooLarge { .. } => ValidationErrorKind::TooLarge,
            ResGuardError::Decode { .. } => ValidationErrorKind::Decode,
            ResGuardError::ParseAnomaly { .. } | ResGuardError::Config(_) => {
                ValidationErrorKind::ParseAnomaly
            }
        }
    }
}

/// A rejection with a human-readable detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub kind: RejectKind,
    pub message: String,
}

impl Rejection {
    pub fn new(kind: RejectKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Fail-closed rejection carrying the error that caused it.
    pub fn from_error(err: &ResGuardError) -> Self {
        Self::new(
            RejectKind::Error(ValidationErrorKind::of(err)),
            err.to_string(),
        )
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Which validator produced the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetectedFormat {
    Binary,
    Text,
    /// Rejected before either validator ran (size bound).
    None,
}

/// Full result for one file, suitable for logging or JSON export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub path: String,
    pub size_bytes: u64,
    pub sha256: String,
    pub format: DetectedFormat,
    pub verdict: Verdict,
    pub rejection: Option<Rejection>,
}

impl ValidationReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

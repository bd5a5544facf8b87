//! Two-stage resource safety classification.
//!
//! Binary validation runs first; a buffer that is not a binary container
//! falls through to text validation. Every input resolves to `Safe` or
//! `Unsafe`. The classifier holds only immutable policy, so one instance
//! can be shared across loader threads.

use crate::error::ResGuardError;
use crate::io::RawFile;
use crate::validate::binary::{self, BinaryScan};
use crate::validate::config::ValidatorConfig;
use crate::validate::outcome::{
    DetectedFormat, RejectKind, Rejection, ValidationReport, Verdict,
};
use crate::validate::text::TextValidator;
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use tracing::{debug, info_span, warn};

#[derive(Debug, Clone)]
pub struct ResourceSafetyClassifier {
    max_size: u64,
    text: TextValidator,
}

impl ResourceSafetyClassifier {
    pub fn new(config: &ValidatorConfig) -> crate::error::Result<Self> {
        config.validate()?;
        Ok(Self {
            max_size: config.io.max_file_size,
            text: TextValidator::new(&config.policy)?,
        })
    }

    /// Classify and explain. Never fails: errors become an `Unsafe` verdict
    /// with an error rejection.
    fn evaluate(&self, data: &[u8]) -> (DetectedFormat, Option<Rejection>) {
        let size = data.len() as u64;
        if size > self.max_size {
            let err = ResGuardError::TooLarge {
                size,
                limit: self.max_size,
            };
            return (DetectedFormat::None, Some(Rejection::from_error(&err)));
        }

        match binary::scan(data) {
            BinaryScan::Clean => (DetectedFormat::Binary, None),
            BinaryScan::ScriptAt(offset) => (
                DetectedFormat::Binary,
                Some(Rejection::new(
                    RejectKind::EmbeddedScriptBlob,
                    format!("compiled script signature at byte {offset}"),
                )),
            ),
            BinaryScan::Unrecognized => match self.text.inspect(data) {
                Ok(rejection) => (DetectedFormat::Text, rejection),
                Err(e) => (DetectedFormat::Text, Some(Rejection::from_error(&e))),
            },
        }
    }

    /// Decide whether `data`, loaded from `path`, is safe to deserialize.
    pub fn validate(&self, path: &str, data: &[u8]) -> Verdict {
        let span = info_span!("validate", path = %path, size = data.len());
        let _guard = span.enter();

        let (format, rejection) = self.evaluate(data);
        match rejection {
            None => {
                debug!(?format, "Resource accepted");
                Verdict::Safe
            }
            Some(r) => {
                if matches!(r.kind, RejectKind::Error(_)) {
                    crate::log_error!(&r.message, path);
                } else {
                    warn!(path = %path, ?format, reason = %r, "Resource rejected");
                }
                Verdict::Unsafe
            }
        }
    }

    pub fn validate_file(&self, file: &RawFile) -> Verdict {
        self.validate(&file.path, &file.bytes)
    }

    /// Full report for one file, including a SHA-256 of its contents.
    pub fn report(&self, file: &RawFile) -> ValidationReport {
        let (format, rejection) = self.evaluate(&file.bytes);
        let verdict = if rejection.is_none() {
            Verdict::Safe
        } else {
            Verdict::Unsafe
        };
        ValidationReport {
            path: file.path.clone(),
            size_bytes: file.len() as u64,
            sha256: hex::encode(Sha256::digest(&file.bytes)),
            format,
            verdict,
            rejection,
        }
    }

    /// Validate many files in parallel. Output order matches input order.
    pub fn validate_many(&self, files: &[RawFile]) -> Vec<Verdict> {
        files.par_iter().map(|f| self.validate_file(f)).collect()
    }
}

//! Error types for the resguard resource validator.
//!
//! Every failure inside the validation engine resolves to an `Unsafe`
//! verdict; these types describe *why*, for diagnostics and for callers of
//! the load gate that need to surface I/O problems.

use crate::io::error::IoError;
use thiserror::Error;

/// Main error type for resguard operations.
#[derive(Debug, Error)]
pub enum ResGuardError {
    /// The raw file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// The buffer exceeds the configured validation bound.
    #[error("Input too large: {size} bytes (limit: {limit})")]
    TooLarge { size: u64, limit: u64 },

    /// The buffer is not valid UTF-8 text.
    #[error("Decode error at byte {offset}: {message}")]
    Decode { offset: usize, message: String },

    /// Section or tag syntax that prevents a confident safety decision.
    #[error("Parse anomaly in section [{section}]: {message}")]
    ParseAnomaly { section: String, message: String },

    /// Invalid validator configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure reported by the host's deserialization capability.
    #[error("Host loader error: {0}")]
    Host(#[from] anyhow::Error),
}

/// Result type alias for resguard operations
pub type Result<T> = std::result::Result<T, ResGuardError>;

impl From<std::io::Error> for ResGuardError {
    fn from(err: std::io::Error) -> Self {
        ResGuardError::Io(IoError::StdIo(err))
    }
}

//! Configuration for the validator and load gate.
//!
//! Provides centralized configuration with defaults matching the fixed
//! policy of the trusted package. The binary signatures are not
//! configurable; see [`crate::validate::signatures`].

use crate::error::{ResGuardError, Result};
use crate::io::IOLimits;
use crate::validate::signatures;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Master configuration for validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// I/O bounds; `max_file_size` also bounds in-memory validation.
    pub io: IOLimits,
    /// Trust boundary and name sets.
    pub policy: PolicyConfig,
}

/// Trust boundary and safety policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// URI prefix of the trusted package (default: `res://`).
    pub trusted_prefix: String,
    /// Extensions eligible for interception, without the dot.
    pub recognized_extensions: Vec<String>,
    /// Executable resource type names, compared case-insensitively.
    pub type_blacklist: Vec<String>,
    /// Text marker of embedded script source, compared case-insensitively.
    pub source_marker: String,
    /// Resource type names the loader claims from the host.
    pub handled_types: Vec<String>,
    /// Reject text that contains no section header at all.
    pub reject_unrecognized: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        let owned = |v: &[&str]| -> Vec<String> { v.iter().map(|s| s.to_string()).collect() };
        Self {
            trusted_prefix: signatures::TRUSTED_PREFIX.to_string(),
            recognized_extensions: owned(signatures::RECOGNIZED_EXTENSIONS),
            type_blacklist: owned(signatures::TYPE_BLACKLIST),
            source_marker: signatures::SOURCE_MARKER.to_string(),
            handled_types: owned(signatures::HANDLED_TYPES),
            reject_unrecognized: false,
        }
    }
}

impl ValidatorConfig {
    /// Parse and check a JSON configuration. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ResGuardError::Config(format!("invalid JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject configurations that would weaken the trust boundary.
    pub fn validate(&self) -> Result<()> {
        if self.policy.trusted_prefix.is_empty() {
            return Err(ResGuardError::Config("trusted_prefix is empty".into()));
        }
        if self.policy.recognized_extensions.is_empty() {
            return Err(ResGuardError::Config(
                "recognized_extensions is empty".into(),
            ));
        }
        if self.policy.source_marker.is_empty() {
            return Err(ResGuardError::Config("source_marker is empty".into()));
        }
        if self.io.max_file_size == 0 || self.io.max_read_bytes == 0 {
            return Err(ResGuardError::Config("size limits must be non-zero".into()));
        }
        Ok(())
    }
}

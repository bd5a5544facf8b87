//! Bounded and safe I/O utilities for resource files.
//!
//! Files are memory-mapped and copied out whole. Size limits are checked
//! against file metadata first, so a hostile, absurdly large file is refused
//! before any of it is decoded.

pub mod error;

use crate::io::error::{IoError, Result};
use bytes::Bytes;
use memmap2::Mmap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Size bounds applied to every resource read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IOLimits {
    /// Largest file that will be opened at all.
    pub max_file_size: u64,
    /// Total bytes one reader may copy out across all reads.
    pub max_read_bytes: u64,
}

impl Default for IOLimits {
    fn default() -> Self {
        Self {
            max_file_size: 64 * 1024 * 1024,  // 64MB
            max_read_bytes: 64 * 1024 * 1024, // 64MB
        }
    }
}

/// The raw bytes of a resource file plus the identifier it was loaded from.
///
/// The path is only used for diagnostics and notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFile {
    pub path: String,
    pub bytes: Bytes,
}

impl RawFile {
    pub fn new(path: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            path: path.into(),
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Bounded, memory-mapped reader over one resource file.
pub struct SafeReader {
    path: PathBuf,
    // None when the file size is zero; memmap cannot map empty files.
    mmap: Option<Mmap>,
    limits: IOLimits,
    bytes_read: u64,
    file_size: u64,
}

impl SafeReader {
    /// Open and map `path`. Fails with `FileTooLarge` above
    /// `limits.max_file_size` and with `NotAFile` for directories.
    pub fn open<P: AsRef<Path>>(path: P, limits: IOLimits) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let metadata = file.metadata()?;
        if !metadata.is_file() {
            return Err(IoError::NotAFile {
                path: path.to_path_buf(),
            });
        }
        let file_size = metadata.len();

        debug!(
            path = %path.display(),
            size = file_size,
            limits.max_file_size = limits.max_file_size,
            "Opening resource file for safe reading"
        );

        if file_size > limits.max_file_size {
            warn!(
                path = %path.display(),
                size = file_size,
                limit = limits.max_file_size,
                "Resource file is too large"
            );
            return Err(IoError::FileTooLarge {
                limit: limits.max_file_size,
                found: file_size,
            });
        }

        let mmap = if file_size == 0 {
            None
        } else {
            // Safety: read-only map of a regular file; the contents are copied out
            // before validation so later truncation cannot alias validated bytes.
            Some(unsafe { Mmap::map(&file)? })
        };

        Ok(Self {
            path: path.to_path_buf(),
            mmap,
            limits,
            bytes_read: 0,
            file_size,
        })
    }

    pub fn size(&self) -> u64 {
        self.file_size
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Reads the complete file into an owned buffer.
    ///
    /// # Errors
    ///
    /// Returns `IoError::ReadLimitExceeded` if the file is larger than what
    /// remains of `limits.max_read_bytes`; a partial buffer is never returned.
    pub fn read_all(&mut self) -> Result<Bytes> {
        let map = match &self.mmap {
            Some(m) => m,
            None => return Ok(Bytes::new()),
        };

        let len = map.len() as u64;
        if self.bytes_read.saturating_add(len) > self.limits.max_read_bytes {
            warn!(
                path = %self.path.display(),
                requested = len,
                limit = self.limits.max_read_bytes,
                "Read limit exceeded"
            );
            return Err(IoError::ReadLimitExceeded {
                limit: self.limits.max_read_bytes,
                requested: len,
            });
        }

        let out = Bytes::copy_from_slice(&map[..]);
        self.bytes_read += len;

        trace!(
            path = %self.path.display(),
            len = len,
            total_read = self.bytes_read,
            "Read complete file"
        );

        Ok(out)
    }
}

/// Read the complete raw bytes of a resource file, honoring `limits`.
pub fn read_resource_file(path: &str, limits: &IOLimits) -> Result<RawFile> {
    let mut reader = SafeReader::open(path, limits.clone())?;
    let bytes = reader.read_all()?;
    Ok(RawFile::new(path, bytes))
}

//! Errors raised while reading a resource file from disk.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoError {
    #[error("resource file is {found} bytes, over the {limit} byte limit")]
    FileTooLarge { limit: u64, found: u64 },

    #[error("reading {requested} more bytes would exceed the {limit} byte read budget")]
    ReadLimitExceeded { limit: u64, requested: u64 },

    #[error("{} is not a regular file", .path.display())]
    NotAFile { path: PathBuf },

    #[error("failed to read resource file: {0}")]
    StdIo(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IoError>;

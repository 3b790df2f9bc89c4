//! Failure kinds of a hashing run. Every kind is fatal for the run that raised it.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HashError {
    /// Entry under the root (or the root itself) could not be read while walking.
    #[error("failed to walk path {}: {msg}", path.display())]
    Walk { path: PathBuf, msg: String },

    #[error("failed to open file at {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// I/O error after the file was opened (metadata, read, or mmap).
    #[error("failed to calculate hash for {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("hashing cancelled")]
    Cancelled,
}

impl HashError {
    pub fn is_walk(&self) -> bool {
        matches!(self, HashError::Walk { .. })
    }

    /// Path the failure is attributed to, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            HashError::Walk { path, .. }
            | HashError::Open { path, .. }
            | HashError::Read { path, .. } => Some(path.as_path()),
            HashError::Cancelled => None,
        }
    }
}

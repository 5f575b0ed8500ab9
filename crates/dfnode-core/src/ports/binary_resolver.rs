//! Binary path resolution port.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::paths::{absolutize, normalize_lexically};

/// A filesystem check failed for a reason other than "not found".
#[derive(Debug, Error)]
#[error("Failed to check {}: {source}", .path.display())]
pub struct ResolutionError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Resolves and validates the on-disk location of the node executable.
pub trait BinaryResolver: Send + Sync {
    /// Join `file_name` onto `base` and normalize the result lexically.
    ///
    /// Pure: never touches the filesystem. Relative bases are anchored at the
    /// current working directory when it can be determined.
    fn resolve(&self, base: &Path, file_name: &str) -> PathBuf {
        absolutize(&normalize_lexically(&base.join(file_name)))
    }

    /// Whether `path` names an existing regular file.
    ///
    /// Only "not found" maps to `Ok(false)`; every other I/O error is
    /// surfaced.
    fn exists(&self, path: &Path) -> Result<bool, ResolutionError>;
}

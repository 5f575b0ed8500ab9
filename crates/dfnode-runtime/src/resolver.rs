//! Filesystem-backed binary resolution.

use std::io;
use std::path::Path;

use dfnode_core::{BinaryResolver, ResolutionError};

/// [`BinaryResolver`] that stats the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsBinaryResolver;

impl FsBinaryResolver {
    pub const fn new() -> Self {
        Self
    }
}

impl BinaryResolver for FsBinaryResolver {
    fn exists(&self, path: &Path) -> Result<bool, ResolutionError> {
        match std::fs::metadata(path) {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(ResolutionError {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

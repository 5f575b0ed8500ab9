//! Location of the managed node binary.

use std::path::PathBuf;

use super::error::PathError;
use super::platform::{EnvLookup, data_root_with, process_env, read_override};

/// Environment variable overriding the binary directory.
pub const BINARY_DIR_ENV: &str = "DFNODE_BINARY_DIR";

/// Directory that holds the `defid` binary.
///
/// `DFNODE_BINARY_DIR` wins; otherwise `<data_root>/binary`.
pub fn binary_dir() -> Result<PathBuf, PathError> {
    binary_dir_with(&process_env)
}

/// [`binary_dir`] with an explicit environment lookup.
pub fn binary_dir_with(lookup: EnvLookup<'_>) -> Result<PathBuf, PathError> {
    if let Some(path) = read_override(lookup, BINARY_DIR_ENV)? {
        return Ok(path);
    }
    Ok(data_root_with(lookup)?.join("binary"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::DATA_DIR_ENV;

    #[test]
    fn binary_dir_defaults_under_data_root() {
        let lookup = |key: &str| (key == DATA_DIR_ENV).then(|| "/srv/defi".to_string());
        assert_eq!(
            binary_dir_with(&lookup).unwrap(),
            PathBuf::from("/srv/defi/binary")
        );
    }

    #[test]
    fn binary_dir_override_wins() {
        let lookup = |key: &str| match key {
            BINARY_DIR_ENV => Some("/usr/local/bin".to_string()),
            DATA_DIR_ENV => Some("/srv/defi".to_string()),
            _ => None,
        };
        assert_eq!(
            binary_dir_with(&lookup).unwrap(),
            PathBuf::from("/usr/local/bin")
        );
    }
}

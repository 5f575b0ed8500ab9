//! Platform-specific roots and environment access.

use std::path::PathBuf;

use super::error::PathError;

/// Environment variable overriding the data root.
pub const DATA_DIR_ENV: &str = "DFNODE_DATA_DIR";

/// Directory name under the system data directory.
const APP_DIR_NAME: &str = "defi-app";

/// Lookup function for environment-style overrides.
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Read a variable from the process environment.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Read an override, treating a set-but-empty value as an error.
pub(super) fn read_override(
    lookup: EnvLookup<'_>,
    key: &'static str,
) -> Result<Option<PathBuf>, PathError> {
    match lookup(key) {
        Some(value) if value.trim().is_empty() => Err(PathError::EmptyOverride(key)),
        Some(value) => Ok(Some(PathBuf::from(value.trim()))),
        None => Ok(None),
    }
}

/// Get the root directory for application data.
///
/// Resolution order:
/// 1. `DFNODE_DATA_DIR` environment variable
/// 2. System data directory (e.g. `~/.local/share/defi-app`)
pub fn data_root() -> Result<PathBuf, PathError> {
    data_root_with(&process_env)
}

/// [`data_root`] with an explicit environment lookup.
pub fn data_root_with(lookup: EnvLookup<'_>) -> Result<PathBuf, PathError> {
    if let Some(path) = read_override(lookup, DATA_DIR_ENV)? {
        return Ok(path);
    }
    let data_dir = dirs::data_dir().ok_or(PathError::NoDataDir)?;
    Ok(data_dir.join(APP_DIR_NAME))
}

/// File name of the node binary on this platform.
pub const fn default_binary_name() -> &'static str {
    #[cfg(target_os = "windows")]
    {
        "defid.exe"
    }

    #[cfg(not(target_os = "windows"))]
    {
        "defid"
    }
}

//! Resolved path snapshot for CLI introspection.

use std::path::PathBuf;

use super::normalize::{absolutize, normalize_lexically};
use super::platform::{EnvLookup, data_root_with, process_env};
use crate::settings::{NodeSettings, SettingsError};

/// All resolved paths captured in a single struct.
///
/// Backs the `dfnode paths` command and makes path resolution easy to
/// compare in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Root directory for application data.
    pub data_root: PathBuf,
    /// Directory holding the node binary.
    pub binary_dir: PathBuf,
    /// Normalized absolute path of the node binary.
    pub executable_path: PathBuf,
    /// Configuration file passed via `-conf=`.
    pub config_file_name: String,
}

impl ResolvedPaths {
    /// Resolve all paths using the current environment.
    pub fn resolve() -> Result<Self, SettingsError> {
        Self::resolve_with(&process_env)
    }

    /// Resolve all paths through an explicit environment lookup.
    pub fn resolve_with(lookup: EnvLookup<'_>) -> Result<Self, SettingsError> {
        let settings = NodeSettings::from_env_with(lookup)?;
        let data_root = data_root_with(lookup)?;
        Ok(Self::from_settings(data_root, &settings))
    }

    pub fn from_settings(data_root: PathBuf, settings: &NodeSettings) -> Self {
        Self {
            data_root,
            binary_dir: settings.binary_dir.clone(),
            executable_path: absolutize(&normalize_lexically(&settings.executable_path())),
            config_file_name: settings.config_file_name.clone(),
        }
    }
}

impl std::fmt::Display for ResolvedPaths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "data_root = {}", self.data_root.display())?;
        writeln!(f, "binary_dir = {}", self.binary_dir.display())?;
        writeln!(f, "executable_path = {}", self.executable_path.display())?;
        write!(f, "config_file_name = {}", self.config_file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::DATA_DIR_ENV;

    fn fixed_root(key: &str) -> Option<String> {
        (key == DATA_DIR_ENV).then(|| "/srv/defi".to_string())
    }

    #[test]
    fn resolve_returns_consistent_paths() {
        let first = ResolvedPaths::resolve_with(&fixed_root).expect("first resolve");
        let second = ResolvedPaths::resolve_with(&fixed_root).expect("second resolve");
        assert_eq!(first, second, "path resolution should be deterministic");
        assert!(first.executable_path.starts_with("/srv/defi/binary"));
    }

    #[test]
    fn display_format_is_parseable() {
        let paths = ResolvedPaths::resolve_with(&fixed_root).expect("resolve");
        let output = paths.to_string();

        for line in output.lines() {
            assert!(line.contains(" = "), "line should be key = value: {line}");
        }
        assert!(output.contains("config_file_name = defi.conf"));
    }
}

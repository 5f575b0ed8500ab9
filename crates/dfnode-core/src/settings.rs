//! Node supervisor settings and validation.
//!
//! Settings are plain data. They are built from defaults plus environment
//! overrides; the lookup function is injectable so tests never touch the
//! process environment.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::paths::{EnvLookup, PathError, binary_dir_with, default_binary_name, process_env};

/// Default configuration file passed via `-conf=`.
pub const DEFAULT_CONFIG_FILE_NAME: &str = "defi.conf";

/// Default time a node gets to exit after SIGTERM before it is killed.
pub const DEFAULT_STOP_GRACE_SECS: u64 = 5;

/// Upper bound for the stop grace period.
const MAX_STOP_GRACE_SECS: u64 = 600;

pub const BINARY_NAME_ENV: &str = "DFNODE_BINARY_NAME";
pub const CONFIG_FILE_ENV: &str = "DFNODE_CONFIG_FILE";
pub const STOP_GRACE_ENV: &str = "DFNODE_STOP_GRACE_SECS";

/// Where the node binary lives and how it is launched and stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSettings {
    /// Directory holding the node binary.
    pub binary_dir: PathBuf,
    /// File name of the node binary inside `binary_dir`.
    pub binary_name: String,
    /// Configuration file passed to the node via `-conf=`.
    pub config_file_name: String,
    /// Seconds between SIGTERM and SIGKILL on stop.
    pub stop_grace_period_secs: u64,
}

impl NodeSettings {
    /// Settings with defaults rooted at `binary_dir`.
    pub fn with_binary_dir(binary_dir: impl Into<PathBuf>) -> Self {
        Self {
            binary_dir: binary_dir.into(),
            binary_name: default_binary_name().to_string(),
            config_file_name: DEFAULT_CONFIG_FILE_NAME.to_string(),
            stop_grace_period_secs: DEFAULT_STOP_GRACE_SECS,
        }
    }

    /// Defaults plus overrides from the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_env_with(&process_env)
    }

    /// Defaults plus overrides read through `lookup`.
    pub fn from_env_with(lookup: EnvLookup<'_>) -> Result<Self, SettingsError> {
        let mut settings = Self::with_binary_dir(binary_dir_with(lookup)?);

        if let Some(name) = lookup(BINARY_NAME_ENV) {
            settings.binary_name = name.trim().to_string();
        }
        if let Some(file) = lookup(CONFIG_FILE_ENV) {
            settings.config_file_name = file.trim().to_string();
        }
        if let Some(raw) = lookup(STOP_GRACE_ENV) {
            settings.stop_grace_period_secs =
                raw.trim()
                    .parse()
                    .map_err(|_| SettingsError::InvalidGracePeriod {
                        value: raw.clone(),
                    })?;
        }

        validate_settings(&settings)?;
        Ok(settings)
    }

    /// Absolute-or-relative path of the node binary, unnormalized.
    pub fn executable_path(&self) -> PathBuf {
        self.binary_dir.join(&self.binary_name)
    }

    pub const fn stop_grace_period(&self) -> Duration {
        Duration::from_secs(self.stop_grace_period_secs)
    }
}

/// Settings validation errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error("Binary name cannot be empty")]
    EmptyBinaryName,

    #[error("Binary name must be a plain file name, got '{0}'")]
    BinaryNameHasSeparator(String),

    #[error("Config file name cannot be empty")]
    EmptyConfigFileName,

    #[error("Stop grace period must be a whole number of seconds, got '{value}'")]
    InvalidGracePeriod { value: String },

    #[error("Stop grace period must be at most {} seconds, got {0}", MAX_STOP_GRACE_SECS)]
    GracePeriodTooLong(u64),
}

/// Validate settings values.
pub fn validate_settings(settings: &NodeSettings) -> Result<(), SettingsError> {
    if settings.binary_name.trim().is_empty() {
        return Err(SettingsError::EmptyBinaryName);
    }

    if settings.binary_name.contains(['/', '\\']) {
        return Err(SettingsError::BinaryNameHasSeparator(
            settings.binary_name.clone(),
        ));
    }

    if settings.config_file_name.trim().is_empty() {
        return Err(SettingsError::EmptyConfigFileName);
    }

    if settings.stop_grace_period_secs > MAX_STOP_GRACE_SECS {
        return Err(SettingsError::GracePeriodTooLong(
            settings.stop_grace_period_secs,
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::{BINARY_DIR_ENV, DATA_DIR_ENV};
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_under_data_root() {
        let lookup = lookup_from(&[(DATA_DIR_ENV, "/srv/defi")]);
        let settings = NodeSettings::from_env_with(&lookup).unwrap();

        assert_eq!(settings.binary_dir, PathBuf::from("/srv/defi/binary"));
        assert_eq!(settings.binary_name, default_binary_name());
        assert_eq!(settings.config_file_name, DEFAULT_CONFIG_FILE_NAME);
        assert_eq!(settings.stop_grace_period(), Duration::from_secs(5));
    }

    #[test]
    fn test_env_overrides() {
        let lookup = lookup_from(&[
            (BINARY_DIR_ENV, "/usr/local/defi"),
            (BINARY_NAME_ENV, "defid-testnet"),
            (CONFIG_FILE_ENV, "testnet.conf"),
            (STOP_GRACE_ENV, " 12 "),
        ]);
        let settings = NodeSettings::from_env_with(&lookup).unwrap();

        assert_eq!(
            settings.executable_path(),
            PathBuf::from("/usr/local/defi/defid-testnet")
        );
        assert_eq!(settings.config_file_name, "testnet.conf");
        assert_eq!(settings.stop_grace_period_secs, 12);
    }

    #[test]
    fn test_invalid_grace_period() {
        let lookup = lookup_from(&[(DATA_DIR_ENV, "/srv/defi"), (STOP_GRACE_ENV, "soon")]);
        assert!(matches!(
            NodeSettings::from_env_with(&lookup),
            Err(SettingsError::InvalidGracePeriod { .. })
        ));

        let lookup = lookup_from(&[(DATA_DIR_ENV, "/srv/defi"), (STOP_GRACE_ENV, "3600")]);
        assert!(matches!(
            NodeSettings::from_env_with(&lookup),
            Err(SettingsError::GracePeriodTooLong(3600))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_names() {
        let mut settings = NodeSettings::with_binary_dir("/opt/defi");
        assert!(validate_settings(&settings).is_ok());

        settings.binary_name = "bin/defid".to_string();
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::BinaryNameHasSeparator(_))
        ));

        settings.binary_name = "defid".to_string();
        settings.config_file_name = " ".to_string();
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::EmptyConfigFileName)
        ));
    }

    #[test]
    fn test_empty_data_dir_override_is_path_error() {
        let lookup = lookup_from(&[(DATA_DIR_ENV, "")]);
        assert!(matches!(
            NodeSettings::from_env_with(&lookup),
            Err(SettingsError::Path(PathError::EmptyOverride(_)))
        ));
    }
}

//! Mapping from caller-supplied launch parameters to a concrete command line.
//!
//! The node is always launched as `<executable> -conf=<configFileName>`.
//! Extra parameters, when present, follow as `-key=value` options in key order.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::process::SupervisedProcess;
use crate::ports::SupervisorError;

/// Caller-supplied parameter set for a node launch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LaunchParams {
    options: BTreeMap<String, String>,
}

impl LaunchParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an option, replacing any previous value for the same key.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.options.insert(key.into(), value.into());
    }

    /// Parse `key=value` (or bare `key`) pairs, as typed on a command line.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, SupervisorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut params = Self::new();
        for pair in pairs {
            let pair = pair.as_ref().trim();
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            validate_option_name(key.trim())?;
            params.insert(key.trim(), value.trim());
        }
        Ok(params)
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A fully resolved node command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    executable: PathBuf,
    config_file_name: String,
    args: Vec<String>,
}

impl LaunchCommand {
    /// Build the command line for `executable` from `params`.
    pub fn from_params(
        executable: &Path,
        config_file_name: &str,
        params: &LaunchParams,
    ) -> Result<Self, SupervisorError> {
        if config_file_name.trim().is_empty() {
            return Err(SupervisorError::Configuration(
                "config file name cannot be empty".to_string(),
            ));
        }

        let mut args = Vec::with_capacity(params.len() + 1);
        args.push(format!("-conf={config_file_name}"));

        for (key, value) in params.iter() {
            validate_option_name(key)?;
            if value.is_empty() {
                args.push(format!("-{key}"));
            } else {
                args.push(format!("-{key}={value}"));
            }
        }

        Ok(Self {
            executable: executable.to_path_buf(),
            config_file_name: config_file_name.to_string(),
            args,
        })
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn config_file_name(&self) -> &str {
        &self.config_file_name
    }

    /// Arguments passed after the executable.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Record of this command once spawned as `pid`.
    pub fn to_supervised(&self, pid: Option<u32>) -> SupervisedProcess {
        SupervisedProcess::new(
            self.executable.clone(),
            self.config_file_name.clone(),
            self.args.clone(),
            pid,
        )
    }
}

fn validate_option_name(key: &str) -> Result<(), SupervisorError> {
    if key.is_empty() {
        return Err(SupervisorError::Configuration(
            "launch option name cannot be empty".to_string(),
        ));
    }
    if key.starts_with('-') {
        return Err(SupervisorError::Configuration(format!(
            "launch option '{key}' must be given without leading dashes"
        )));
    }
    if key.chars().any(char::is_whitespace) {
        return Err(SupervisorError::Configuration(format!(
            "launch option '{key}' cannot contain whitespace"
        )));
    }
    if key == "conf" {
        return Err(SupervisorError::Configuration(
            "the config file is set by the supervisor, not by launch options".to_string(),
        ));
    }
    Ok(())
}

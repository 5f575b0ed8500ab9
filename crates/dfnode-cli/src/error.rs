//! CLI-specific error types and mappings.
//!
//! Maps supervisor failures and failed envelopes to exit codes and
//! user-facing messages.

use dfnode_core::{ErrorKind, ResponseEnvelope, SettingsError, SupervisorError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Failure reported by the supervisor, carried with its category.
    #[error("{message}")]
    Node { kind: ErrorKind, message: String },

    /// Argument parsing error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (stdout closed, serialization failure, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CliError {
    /// Build an error from a failed envelope. Successful envelopes yield
    /// `None`.
    pub fn from_envelope(envelope: &ResponseEnvelope) -> Option<Self> {
        let kind = envelope.error_kind()?;
        Some(Self::Node {
            kind,
            message: envelope.message_text().unwrap_or(kind.as_str()).to_string(),
        })
    }

    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Node { kind, .. } => match kind {
                ErrorKind::BinaryNotFound => 69, // EX_UNAVAILABLE
                ErrorKind::ResolutionError => 74, // EX_IOERR
                ErrorKind::QueryError | ErrorKind::SpawnError => 71, // EX_OSERR
                ErrorKind::TerminationError => 75, // EX_TEMPFAIL
                ErrorKind::ConfigurationError => 78, // EX_CONFIG
                ErrorKind::OutputFailure | ErrorKind::ProcessExited => 1,
            },
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
        }
    }
}

impl From<SupervisorError> for CliError {
    fn from(err: SupervisorError) -> Self {
        match err {
            SupervisorError::Configuration(msg) => Self::Arguments(msg),
            other => Self::Node {
                kind: other.kind(),
                message: other.to_string(),
            },
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn failed_envelope_keeps_kind_and_message() {
        let envelope =
            ResponseEnvelope::failure(ErrorKind::BinaryNotFound, "Binary file is not available");
        let err = CliError::from_envelope(&envelope).unwrap();

        assert_eq!(err.to_string(), "Binary file is not available");
        assert_eq!(err.exit_code(), 69);
    }

    #[test]
    fn successful_envelope_is_not_an_error() {
        assert!(CliError::from_envelope(&ResponseEnvelope::message("Node starting")).is_none());
    }

    #[test]
    fn supervisor_errors_map_to_exit_codes() {
        let missing = CliError::from(SupervisorError::BinaryNotFound {
            path: PathBuf::from("/opt/defi/defid"),
        });
        assert_eq!(missing.exit_code(), 69);

        let bad_option = CliError::from(SupervisorError::Configuration("bad".to_string()));
        assert!(matches!(bad_option, CliError::Arguments(_)));
        assert_eq!(bad_option.exit_code(), 2);
    }

    #[test]
    fn settings_errors_are_config_errors() {
        let err = CliError::from(SettingsError::EmptyBinaryName);
        assert_eq!(err.exit_code(), 78);
    }
}

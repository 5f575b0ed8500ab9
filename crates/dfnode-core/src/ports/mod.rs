//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the supervisor expects from infrastructure:
//! the OS process table, the filesystem, and whoever listens for lifecycle
//! notifications. They contain no implementation details and use only domain
//! types.

pub mod binary_resolver;
pub mod node_controller;
pub mod notification;
pub mod process_locator;

use std::path::PathBuf;

use serde_json::json;
use thiserror::Error;

use crate::envelope::{ErrorKind, ResponseEnvelope};

pub use binary_resolver::{BinaryResolver, ResolutionError};
pub use node_controller::NodeController;
pub use notification::{NoopChannel, NotificationChannel};
pub use process_locator::{LocatorError, MatchCriteria, ProcessLocator, ProcessMatch};

/// Immediate outcome of a successful start call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// A matching node was already running; nothing was spawned.
    AlreadyRunning {
        /// PIDs of the instances that were found.
        pids: Vec<u32>,
    },
    /// A new child process was spawned.
    Spawned {
        /// PID reported by the OS, if any.
        pid: Option<u32>,
    },
}

impl StartOutcome {
    pub const fn is_spawned(&self) -> bool {
        matches!(self, Self::Spawned { .. })
    }

    pub fn to_envelope(&self) -> ResponseEnvelope {
        match self {
            Self::AlreadyRunning { pids } => {
                ResponseEnvelope::message("Node already running").with_field("pids", json!(pids))
            }
            Self::Spawned { pid } => {
                ResponseEnvelope::message("Node starting").with_field("pid", json!(pid))
            }
        }
    }
}

/// One PID that could not be terminated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminationFailure {
    pub pid: u32,
    pub reason: String,
}

/// Per-PID result of a stop call, in the order the PIDs were attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopReport {
    /// Every PID a termination request was issued for.
    pub attempted: Vec<u32>,
    /// PIDs confirmed gone.
    pub terminated: Vec<u32>,
    pub failures: Vec<TerminationFailure>,
}

impl StopReport {
    pub fn record_success(&mut self, pid: u32) {
        self.attempted.push(pid);
        self.terminated.push(pid);
    }

    pub fn record_failure(&mut self, pid: u32, reason: impl Into<String>) {
        self.attempted.push(pid);
        self.failures.push(TerminationFailure {
            pid,
            reason: reason.into(),
        });
    }

    /// True when every attempted PID was terminated.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// `"pid 12: reason; pid 34: reason"`
    pub fn failure_summary(&self) -> String {
        self.failures
            .iter()
            .map(|f| format!("pid {}: {}", f.pid, f.reason))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn to_envelope(&self) -> ResponseEnvelope {
        ResponseEnvelope::message("Initiated termination of node")
            .with_field("terminated", json!(self.terminated))
    }
}

/// Errors returned synchronously by supervisor operations.
///
/// Stream-derived conditions (stderr output, unexpected exit) never appear
/// here; they are pushed as lifecycle events instead.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// The OS process table could not be enumerated.
    #[error("Failed to query running processes: {0}")]
    Query(#[from] LocatorError),

    /// The binary path could not be checked.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// The node binary does not exist.
    #[error("Binary file is not available: {}", .path.display())]
    BinaryNotFound { path: PathBuf },

    /// The OS refused to create the node process.
    #[error("Failed to spawn {}: {source}", .path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// One or more PIDs could not be terminated.
    #[error("Failed to terminate node process: {}", .report.failure_summary())]
    Termination { report: StopReport },

    /// Launch parameters or settings were invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl SupervisorError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Query(_) => ErrorKind::QueryError,
            Self::Resolution(_) => ErrorKind::ResolutionError,
            Self::BinaryNotFound { .. } => ErrorKind::BinaryNotFound,
            Self::Spawn { .. } => ErrorKind::SpawnError,
            Self::Termination { .. } => ErrorKind::TerminationError,
            Self::Configuration(_) => ErrorKind::ConfigurationError,
        }
    }

    /// Failed envelope describing this error.
    pub fn to_envelope(&self) -> ResponseEnvelope {
        let envelope = ResponseEnvelope::failure(self.kind(), self.to_string());
        match self {
            Self::Resolution(err) => envelope.with_field("path", err.path.display().to_string()),
            Self::BinaryNotFound { path } | Self::Spawn { path, .. } => {
                envelope.with_field("path", path.display().to_string())
            }
            Self::Termination { report } => envelope.with_details(json!({
                "terminated": report.terminated,
                "failed": report
                    .failures
                    .iter()
                    .map(|f| json!({ "pid": f.pid, "reason": f.reason }))
                    .collect::<Vec<_>>(),
            })),
            Self::Query(_) | Self::Configuration(_) => envelope,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_not_found_message_names_path() {
        let err = SupervisorError::BinaryNotFound {
            path: PathBuf::from("/opt/defi/binary/defid"),
        };
        assert_eq!(
            err.to_string(),
            "Binary file is not available: /opt/defi/binary/defid"
        );
        let envelope = err.to_envelope();
        assert!(!envelope.success);
        assert_eq!(envelope.error_kind(), Some(ErrorKind::BinaryNotFound));
        assert_eq!(
            envelope.field("path"),
            Some(&json!("/opt/defi/binary/defid"))
        );
    }

    #[test]
    fn termination_error_names_failed_pids() {
        let mut report = StopReport::default();
        report.record_success(10);
        report.record_failure(20, "Operation not permitted");
        report.record_success(30);

        assert_eq!(report.attempted, vec![10, 20, 30]);
        assert!(!report.is_clean());

        let err = SupervisorError::Termination { report };
        assert!(err.to_string().contains("pid 20: Operation not permitted"));

        let envelope = err.to_envelope();
        assert_eq!(envelope.error_kind(), Some(ErrorKind::TerminationError));
        assert_eq!(envelope.field("terminated"), Some(&json!([10, 30])));
        assert_eq!(
            envelope.field("failed"),
            Some(&json!([{ "pid": 20, "reason": "Operation not permitted" }]))
        );
    }

    #[test]
    fn outcomes_map_to_success_envelopes() {
        let spawned = StartOutcome::Spawned { pid: Some(99) }.to_envelope();
        assert!(spawned.success);
        assert_eq!(spawned.message_text(), Some("Node starting"));
        assert_eq!(spawned.field("pid"), Some(&json!(99)));

        let running = StartOutcome::AlreadyRunning { pids: vec![5] }.to_envelope();
        assert_eq!(running.message_text(), Some("Node already running"));

        let stopped = StopReport::default().to_envelope();
        assert_eq!(
            stopped.message_text(),
            Some("Initiated termination of node")
        );
        assert_eq!(stopped.field("terminated"), Some(&json!([])));
    }
}

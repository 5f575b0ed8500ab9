//! Supervisor state and the record of a spawned node process.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a node supervisor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupervisorState {
    /// Nothing has been started yet.
    #[default]
    Idle,
    /// A child was spawned and has not produced stdout output yet.
    Starting,
    /// The child produced stdout output.
    Running,
    /// A stop was requested for the tracked child.
    Stopping,
    /// The tracked child exited.
    Stopped,
    /// The last start attempt failed before or during spawn.
    Failed,
}

impl SupervisorState {
    /// Whether a child process is tracked in this state.
    pub const fn has_live_child(self) -> bool {
        matches!(self, Self::Starting | Self::Running | Self::Stopping)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for SupervisorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node process spawned by a supervisor.
///
/// The OS handle itself stays inside the runtime; this is the descriptive
/// record that lives exactly as long as the handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupervisedProcess {
    /// Absolute path of the executable that was spawned.
    pub executable_path: PathBuf,
    /// Configuration file passed via `-conf=`.
    pub config_file_name: String,
    /// Arguments passed after the executable.
    pub argv: Vec<String>,
    /// OS process ID, when the platform reported one.
    pub pid: Option<u32>,
    /// Unix timestamp (seconds) of the spawn.
    pub started_at: u64,
}

impl SupervisedProcess {
    pub fn new(
        executable_path: PathBuf,
        config_file_name: String,
        argv: Vec<String>,
        pid: Option<u32>,
    ) -> Self {
        Self {
            executable_path,
            config_file_name,
            argv,
            pid,
            started_at: now_secs(),
        }
    }
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_child_states() {
        assert!(SupervisorState::Starting.has_live_child());
        assert!(SupervisorState::Running.has_live_child());
        assert!(SupervisorState::Stopping.has_live_child());
        assert!(!SupervisorState::Idle.has_live_child());
        assert!(!SupervisorState::Stopped.has_live_child());
        assert!(!SupervisorState::Failed.has_live_child());
    }

    #[test]
    fn state_serializes_lowercase() {
        let json = serde_json::to_string(&SupervisorState::Stopping).unwrap();
        assert_eq!(json, "\"stopping\"");
        assert_eq!(SupervisorState::Stopping.to_string(), "stopping");
    }

    #[test]
    fn supervised_process_records_spawn_time() {
        let process = SupervisedProcess::new(
            PathBuf::from("/opt/defi/defid"),
            "defi.conf".to_string(),
            vec!["-conf=defi.conf".to_string()],
            Some(42),
        );
        assert!(process.started_at > 0);
        assert_eq!(process.pid, Some(42));
    }
}

//! Lifecycle events produced while a node process runs.
//!
//! The supervisor turns raw process activity (stdout bytes, stderr bytes, exit
//! status) into these events. Each event maps 1:1 to a [`ResponseEnvelope`]
//! before it is pushed to a notification channel.
//!
//! # Wire Format
//!
//! Envelopes produced from events carry the event name under `event`:
//!
//! ```json
//! { "success": true, "payload": { "event": "node:started", "message": "Node started" } }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::envelope::{ErrorKind, ResponseEnvelope};

/// Name of the reply channel listeners subscribe to for start notifications.
pub const START_NODE_REPLY_CHANNEL: &str = "start-defi-chain-reply";

/// Stable event names used on the wire.
pub mod names {
    pub const ALREADY_RUNNING: &str = "node:already_running";
    pub const STARTED: &str = "node:started";
    pub const OUTPUT_FAILURE: &str = "node:output_failure";
    pub const EXITED: &str = "node:exited";
    /// Tags the error envelope of a start that failed before or during spawn.
    pub const START_FAILED: &str = "node:start_failed";
}

/// A single lifecycle notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// Start was called while a node instance was already live.
    AlreadyRunning,

    /// The node produced its first stdout output after a spawn.
    Started,

    /// The node wrote a chunk to stderr.
    OutputFailure {
        /// Trimmed, lossily decoded chunk text.
        message: String,
    },

    /// The node process terminated.
    ProcessExited {
        /// Exit code, `None` when the process was ended by a signal.
        code: Option<i32>,
        /// Whether the exit followed a stop request from this supervisor.
        requested: bool,
    },
}

impl LifecycleEvent {
    /// Get the event name for wire protocols.
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::AlreadyRunning => names::ALREADY_RUNNING,
            Self::Started => names::STARTED,
            Self::OutputFailure { .. } => names::OUTPUT_FAILURE,
            Self::ProcessExited { .. } => names::EXITED,
        }
    }

    /// Map the event to the envelope pushed to listeners.
    ///
    /// A requested exit is a success; an unrequested one is a failure.
    pub fn to_envelope(&self) -> ResponseEnvelope {
        match self {
            Self::AlreadyRunning => ResponseEnvelope::message("Node already running"),
            Self::Started => ResponseEnvelope::message("Node started"),
            Self::OutputFailure { message } => {
                ResponseEnvelope::failure(ErrorKind::OutputFailure, message.clone())
            }
            Self::ProcessExited {
                code,
                requested: true,
            } => ResponseEnvelope::message(format!("Node stopped ({})", describe_exit(*code)))
                .with_field("exitCode", json!(code)),
            Self::ProcessExited {
                code,
                requested: false,
            } => ResponseEnvelope::failure(
                ErrorKind::ProcessExited,
                format!("child process {}", describe_exit(*code)),
            )
            .with_details(json!({ "exitCode": code })),
        }
        .with_field("event", self.event_name())
    }
}

impl From<LifecycleEvent> for ResponseEnvelope {
    fn from(event: LifecycleEvent) -> Self {
        event.to_envelope()
    }
}

fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with code {code}"),
        None => "was terminated by a signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = LifecycleEvent::ProcessExited {
            code: Some(1),
            requested: false,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"process_exited\""));
        assert!(json.contains("\"code\":1"));
    }

    #[test]
    fn test_event_names() {
        assert_eq!(LifecycleEvent::Started.event_name(), "node:started");
        assert_eq!(
            LifecycleEvent::AlreadyRunning.event_name(),
            "node:already_running"
        );
        assert_eq!(
            LifecycleEvent::OutputFailure {
                message: String::new()
            }
            .event_name(),
            "node:output_failure"
        );
    }

    #[test]
    fn started_maps_to_success_envelope() {
        let envelope = LifecycleEvent::Started.to_envelope();
        assert!(envelope.success);
        assert_eq!(envelope.message_text(), Some("Node started"));
        assert_eq!(envelope.event_name(), Some(names::STARTED));
    }

    #[test]
    fn output_failure_maps_to_failed_envelope() {
        let envelope = LifecycleEvent::OutputFailure {
            message: "Error: Cannot obtain a lock on data directory".to_string(),
        }
        .to_envelope();
        assert!(!envelope.success);
        assert_eq!(envelope.error_kind(), Some(ErrorKind::OutputFailure));
        assert_eq!(
            envelope.message_text(),
            Some("Error: Cannot obtain a lock on data directory")
        );
        assert_eq!(envelope.event_name(), Some(names::OUTPUT_FAILURE));
    }

    #[test]
    fn unrequested_exit_is_a_failure() {
        let envelope = LifecycleEvent::ProcessExited {
            code: Some(1),
            requested: false,
        }
        .to_envelope();
        assert!(!envelope.success);
        assert_eq!(envelope.error_kind(), Some(ErrorKind::ProcessExited));
        assert_eq!(
            envelope.message_text(),
            Some("child process exited with code 1")
        );
        assert_eq!(envelope.field("exitCode"), Some(&json!(1)));
    }

    #[test]
    fn requested_exit_is_a_success() {
        let envelope = LifecycleEvent::ProcessExited {
            code: None,
            requested: true,
        }
        .to_envelope();
        assert!(envelope.success);
        assert_eq!(
            envelope.message_text(),
            Some("Node stopped (was terminated by a signal)")
        );
        assert_eq!(envelope.event_name(), Some(names::EXITED));
    }
}

//! Node service - the boundary where supervisor results become envelopes.

use std::sync::Arc;

use tracing::warn;

use crate::domain::{LaunchParams, SupervisorState};
use crate::envelope::ResponseEnvelope;
use crate::ports::NodeController;

/// Adapter-facing entry point for node lifecycle requests.
///
/// Every call answers with a [`ResponseEnvelope`]; errors never escape as
/// `Err` past this point.
#[derive(Clone)]
pub struct NodeService {
    controller: Arc<dyn NodeController>,
}

impl NodeService {
    pub fn new(controller: Arc<dyn NodeController>) -> Self {
        Self { controller }
    }

    /// Start the node.
    pub async fn start(&self, params: &LaunchParams) -> ResponseEnvelope {
        match self.controller.start(params).await {
            Ok(outcome) => outcome.to_envelope(),
            Err(e) => {
                warn!(error = %e, kind = %e.kind(), "Node start failed");
                e.to_envelope()
            }
        }
    }

    /// Stop every matching node process.
    pub async fn stop(&self) -> ResponseEnvelope {
        match self.controller.stop().await {
            Ok(report) => report.to_envelope(),
            Err(e) => {
                warn!(error = %e, kind = %e.kind(), "Node stop failed");
                e.to_envelope()
            }
        }
    }

    pub fn state(&self) -> SupervisorState {
        self.controller.state()
    }

    /// `{"state": "<state>", "childTracked": bool}`
    pub fn status(&self) -> ResponseEnvelope {
        let state = self.state();
        ResponseEnvelope::message(format!("Node is {state}"))
            .with_field("state", state.as_str())
            .with_field("childTracked", state.has_live_child())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::ErrorKind;
    use crate::ports::{StartOutcome, StopReport, SupervisorError};
    use async_trait::async_trait;
    use serde_json::json;
    use std::path::PathBuf;
    use std::sync::Mutex;

    struct MockController {
        running: Mutex<bool>,
        binary_present: bool,
        stop_failure: Option<u32>,
    }

    impl MockController {
        fn new(binary_present: bool) -> Self {
            Self {
                running: Mutex::new(false),
                binary_present,
                stop_failure: None,
            }
        }
    }

    #[async_trait]
    impl NodeController for MockController {
        async fn start(&self, _params: &LaunchParams) -> Result<StartOutcome, SupervisorError> {
            if !self.binary_present {
                return Err(SupervisorError::BinaryNotFound {
                    path: PathBuf::from("/missing/defid"),
                });
            }
            let mut running = self.running.lock().unwrap();
            if *running {
                return Ok(StartOutcome::AlreadyRunning { pids: vec![4242] });
            }
            *running = true;
            Ok(StartOutcome::Spawned { pid: Some(4242) })
        }

        async fn stop(&self) -> Result<StopReport, SupervisorError> {
            let mut report = StopReport::default();
            if *self.running.lock().unwrap() {
                report.record_success(4242);
            }
            if let Some(pid) = self.stop_failure {
                report.record_failure(pid, "Operation not permitted");
                return Err(SupervisorError::Termination { report });
            }
            *self.running.lock().unwrap() = false;
            Ok(report)
        }

        fn state(&self) -> SupervisorState {
            if *self.running.lock().unwrap() {
                SupervisorState::Running
            } else {
                SupervisorState::Idle
            }
        }
    }

    #[tokio::test]
    async fn test_start_twice_reports_already_running() {
        let service = NodeService::new(Arc::new(MockController::new(true)));

        let first = service.start(&LaunchParams::new()).await;
        assert!(first.success);
        assert_eq!(first.message_text(), Some("Node starting"));

        let second = service.start(&LaunchParams::new()).await;
        assert!(second.success);
        assert_eq!(second.message_text(), Some("Node already running"));
    }

    #[tokio::test]
    async fn test_missing_binary_becomes_failed_envelope() {
        let service = NodeService::new(Arc::new(MockController::new(false)));

        let envelope = service.start(&LaunchParams::new()).await;
        assert!(!envelope.success);
        assert_eq!(envelope.error_kind(), Some(ErrorKind::BinaryNotFound));
        assert_eq!(
            envelope.message_text(),
            Some("Binary file is not available: /missing/defid")
        );
    }

    #[tokio::test]
    async fn test_stop_reports_terminated_pids() {
        let service = NodeService::new(Arc::new(MockController::new(true)));
        service.start(&LaunchParams::new()).await;
        assert_eq!(service.state(), SupervisorState::Running);

        let envelope = service.stop().await;
        assert!(envelope.success);
        assert_eq!(
            envelope.message_text(),
            Some("Initiated termination of node")
        );
        assert_eq!(envelope.field("terminated"), Some(&json!([4242])));
        assert_eq!(service.state(), SupervisorState::Idle);
    }

    #[tokio::test]
    async fn test_stop_failure_names_pid() {
        let mut controller = MockController::new(true);
        controller.stop_failure = Some(77);
        let service = NodeService::new(Arc::new(controller));

        let envelope = service.stop().await;
        assert!(!envelope.success);
        assert_eq!(envelope.error_kind(), Some(ErrorKind::TerminationError));
        assert!(envelope.message_text().unwrap().contains("pid 77"));
    }

    #[test]
    fn test_status_reports_state() {
        let service = NodeService::new(Arc::new(MockController::new(true)));
        let envelope = service.status();
        assert_eq!(envelope.field("state"), Some(&json!("idle")));
        assert_eq!(envelope.field("childTracked"), Some(&json!(false)));
    }
}

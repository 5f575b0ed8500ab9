//! Node lifecycle control port.

use async_trait::async_trait;

use super::{StartOutcome, StopReport, SupervisorError};
use crate::domain::{LaunchParams, SupervisorState};

/// Lifecycle operations on one supervised node.
///
/// Implemented by the runtime supervisor. Services and adapters depend on
/// this trait so they can be exercised with a fake.
#[async_trait]
pub trait NodeController: Send + Sync {
    /// Start the node unless a matching instance is already live.
    async fn start(&self, params: &LaunchParams) -> Result<StartOutcome, SupervisorError>;

    /// Terminate every matching node process, sequentially.
    async fn stop(&self) -> Result<StopReport, SupervisorError>;

    /// Current lifecycle state.
    fn state(&self) -> SupervisorState;
}

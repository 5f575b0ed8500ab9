//! Notification sink for lifecycle envelopes.
//!
//! The supervisor pushes one [`ResponseEnvelope`] per lifecycle event into a
//! channel it does not own. Delivery is best-effort: with no listener
//! attached the envelope is dropped.

use crate::envelope::ResponseEnvelope;

/// One-way sink for lifecycle envelopes.
///
/// # Implementations
///
/// - `NoopChannel` - for callers that never read lifecycle events
/// - `EnvelopeBroadcaster` in the runtime crate - tokio broadcast fan-out
pub trait NotificationChannel: Send + Sync {
    /// Push an envelope. Must not block.
    fn push(&self, envelope: ResponseEnvelope);
}

/// A channel that discards every envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopChannel;

impl NoopChannel {
    pub const fn new() -> Self {
        Self
    }
}

impl NotificationChannel for NoopChannel {
    fn push(&self, _envelope: ResponseEnvelope) {}
}

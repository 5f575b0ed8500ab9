//! Lifecycle envelope broadcasting.
//!
//! Fans envelopes out to every subscriber of the node reply channel (the CLI
//! printer, a UI bridge, tests). With nobody subscribed, envelopes are
//! dropped.

use dfnode_core::{NotificationChannel, ResponseEnvelope, START_NODE_REPLY_CHANNEL};
use tokio::sync::broadcast;
use tracing::debug;

/// Broadcast channel capacity for lifecycle envelopes
const CHANNEL_CAPACITY: usize = 64;

/// Broadcaster for node lifecycle envelopes
pub struct EnvelopeBroadcaster {
    channel: &'static str,
    sender: broadcast::Sender<ResponseEnvelope>,
}

impl EnvelopeBroadcaster {
    /// Create a broadcaster for the node start reply channel
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            channel: START_NODE_REPLY_CHANNEL,
            sender,
        }
    }

    /// Name listeners use to address this channel
    pub const fn channel(&self) -> &'static str {
        self.channel
    }

    /// Subscribe to lifecycle envelopes
    pub fn subscribe(&self) -> broadcast::Receiver<ResponseEnvelope> {
        self.sender.subscribe()
    }

    /// Get number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EnvelopeBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationChannel for EnvelopeBroadcaster {
    fn push(&self, envelope: ResponseEnvelope) {
        if self.subscriber_count() == 0 {
            debug!(channel = self.channel, "No listener attached, dropping envelope");
            return;
        }
        debug!(channel = self.channel, ?envelope, "Broadcasting envelope");
        let _ = self.sender.send(envelope);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_pushed_envelopes() {
        let broadcaster = EnvelopeBroadcaster::new();
        let mut first = broadcaster.subscribe();
        let mut second = broadcaster.subscribe();

        broadcaster.push(ResponseEnvelope::message("Node started"));

        assert_eq!(
            first.recv().await.unwrap().message_text(),
            Some("Node started")
        );
        assert_eq!(
            second.recv().await.unwrap().message_text(),
            Some("Node started")
        );
    }

    #[tokio::test]
    async fn envelopes_without_listener_are_dropped() {
        let broadcaster = EnvelopeBroadcaster::new();
        broadcaster.push(ResponseEnvelope::message("lost"));

        let mut late = broadcaster.subscribe();
        broadcaster.push(ResponseEnvelope::message("seen"));

        assert_eq!(late.recv().await.unwrap().message_text(), Some("seen"));
        assert_eq!(broadcaster.subscriber_count(), 1);
        assert_eq!(broadcaster.channel(), START_NODE_REPLY_CHANNEL);
    }
}

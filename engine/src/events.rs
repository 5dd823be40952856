//! Overlay change notifications.
//!
//! The store publishes an event after every overlay rewrite so that other
//! views can refresh. Delivery is best effort: nobody listening is fine and a
//! lagging receiver simply misses events.

use crate::UserId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Capacity of the change channel.
pub const EVENT_CAPACITY: usize = 64;

/// A change written to the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum OverlayEvent {
    Created(UserId),
    Updated(UserId),
    Deleted(UserId),
}

/// Fan-out of overlay events to any number of subscribers.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<OverlayEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<OverlayEvent> {
        self.sender.subscribe()
    }

    /// Publish an event. Returns the number of subscribers that received it.
    pub fn publish(&self, event: OverlayEvent) -> usize {
        let recipients = self.sender.send(event).unwrap_or(0);
        tracing::debug!(?event, recipients, "Published overlay event");
        recipients
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

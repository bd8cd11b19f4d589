//! Broadcast event bus for distributing `ControllerEvent` to subscribers.
//!
//! Built on `tokio::sync::broadcast`. Publishing with no active subscribers
//! is a no-op.

use rehearse_types::event::ControllerEvent;
use tokio::sync::broadcast;

/// Capacity used by the session controller.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Multi-consumer event bus for controller events.
///
/// Cloning the bus clones the sender, so the clock ticker task can publish
/// alongside the controller.
pub struct EventBus {
    sender: broadcast::Sender<ControllerEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Create a new subscriber that will receive all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.sender.subscribe()
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: ControllerEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("receiver_count", &self.sender.receiver_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_subscribe_delivers_event() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(ControllerEvent::TimerTick { elapsed_secs: 3 });

        let received = rx.recv().await.unwrap();
        assert_eq!(received, ControllerEvent::TimerTick { elapsed_secs: 3 });
    }

    #[tokio::test]
    async fn clones_share_subscribers() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.clone().publish(ControllerEvent::Error {
            message: "boom".to_string(),
        });

        assert!(matches!(rx.recv().await.unwrap(), ControllerEvent::Error { .. }));
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::new(4);
        bus.publish(ControllerEvent::TimerTick { elapsed_secs: 1 });
    }
}

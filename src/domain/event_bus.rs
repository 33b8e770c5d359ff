//! Broadcast channel for committed events.
//!
//! [`EventBus`] wraps a [`tokio::sync::broadcast`] channel. The ingestion
//! path publishes every committed [`EventRecord`] in commit order; the
//! live-feed task and all WebSocket connections subscribe.

use tokio::sync::broadcast;

use super::event::EventRecord;

/// Broadcast bus for committed [`EventRecord`]s.
///
/// Backed by a `tokio::broadcast` channel with a configurable capacity.
/// When the ring buffer is full, the oldest events are dropped for lagging
/// receivers; those receivers recover from the periodic store poll.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventRecord>,
}

impl EventBus {
    /// Creates a new `EventBus` with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes a committed event to all subscribers.
    ///
    /// Returns the number of receivers that received the event. If there
    /// are no active receivers, the event is silently dropped.
    pub fn publish(&self, event: EventRecord) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Creates a new receiver that will receive all future events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EventRecord> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::event::tests::make_record;

    #[test]
    fn publish_without_receivers_returns_zero() {
        let bus = EventBus::new(100);
        let count = bus.publish(make_record(1, "WALLET_A", "QUBIC", "1", "AddToBidOrder", 0));
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn subscriber_receives_event_in_commit_order() {
        let bus = EventBus::new(100);
        let mut rx = bus.subscribe();

        bus.publish(make_record(1, "WALLET_A", "QUBIC", "1", "AddToBidOrder", 0));
        bus.publish(make_record(2, "WALLET_B", "QUBIC", "2", "AddToAskOrder", 0));

        let Ok(first) = rx.recv().await else {
            panic!("expected first event");
        };
        let Ok(second) = rx.recv().await else {
            panic!("expected second event");
        };
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(100);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        let count = bus.publish(make_record(7, "WALLET_A", "CFB", "9", "IssueAsset", 0));
        assert_eq!(count, 2);

        let Ok(e1) = rx1.recv().await else {
            panic!("rx1 failed");
        };
        let Ok(e2) = rx2.recv().await else {
            panic!("rx2 failed");
        };
        assert_eq!(e1.tx_id, e2.tx_id);
    }

    #[test]
    fn receiver_count_tracks_subscribers() {
        let bus = EventBus::new(100);
        assert_eq!(bus.receiver_count(), 0);

        let rx1 = bus.subscribe();
        assert_eq!(bus.receiver_count(), 1);

        let _rx2 = bus.subscribe();
        assert_eq!(bus.receiver_count(), 2);

        drop(rx1);
        assert_eq!(bus.receiver_count(), 1);
    }
}

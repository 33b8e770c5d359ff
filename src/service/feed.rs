//! Live feed cache and the background task that keeps it warm.
//!
//! The cache holds the newest events so `/feed` answers without a
//! database round trip. Two writers keep it current: bus subscriptions
//! push fresh events to the front, and a periodic refresh replaces the
//! whole window from the store to heal any drift (missed broadcasts,
//! restarts).

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::broadcast::error::RecvError;

use crate::domain::{BoundedFeed, EventBus, EventRecord};
use crate::persistence::EventStore;

/// Shared handle to the in-memory live feed.
#[derive(Debug, Clone)]
pub struct FeedCache {
    inner: Arc<RwLock<BoundedFeed>>,
}

impl FeedCache {
    /// Creates a cache bounded at `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(BoundedFeed::new(capacity))),
        }
    }

    /// Pushes a fresh event to the front. Duplicate `tx_id`s are ignored.
    pub fn push(&self, event: EventRecord) -> bool {
        self.inner.write().push_front(event)
    }

    /// Replaces the cache contents with a newest-first list.
    pub fn refresh(&self, newest_first: Vec<EventRecord>) {
        self.inner.write().refresh(newest_first);
    }

    /// Returns the cached entries, newest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<EventRecord> {
        self.inner.read().snapshot()
    }

    /// Maximum number of entries the cache holds.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.read().capacity()
    }
}

/// Keeps the feed cache current until the event bus closes.
///
/// Fresh events from the bus are pushed immediately; every `refresh`
/// interval the cache is rebuilt from the store. Store failures are
/// logged and retried on the next tick, they never stop the task.
pub async fn run_feed_task(
    cache: FeedCache,
    store: EventStore,
    bus: EventBus,
    refresh: Duration,
) {
    let mut rx = bus.subscribe();
    let mut ticker = tokio::time::interval(refresh);

    #[allow(clippy::cast_possible_wrap)]
    let window = cache.capacity() as i64;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match store.list_recent(window).await {
                    Ok(events) => {
                        tracing::debug!(count = events.len(), "feed refreshed from store");
                        cache.refresh(events);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "feed refresh failed");
                    }
                }
            }
            received = rx.recv() => {
                match received {
                    Ok(event) => {
                        cache.push(event);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "feed task lagged behind the event bus");
                    }
                    Err(RecvError::Closed) => {
                        tracing::info!("event bus closed, stopping feed task");
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::event::tests::make_record;

    #[test]
    fn push_dedupes_and_keeps_newest_first() {
        let cache = FeedCache::new(3);
        assert!(cache.push(make_record(1, "A", "QUBIC", "10", "AddToBidOrder", 0)));
        assert!(cache.push(make_record(2, "B", "QUBIC", "20", "AddToAskOrder", 0)));
        assert!(!cache.push(make_record(1, "A", "QUBIC", "10", "AddToBidOrder", 0)));

        let snapshot = cache.snapshot();
        assert_eq!(snapshot.len(), 2);
        let Some(first) = snapshot.first() else {
            panic!("snapshot should not be empty");
        };
        assert_eq!(first.id, 2);
    }

    #[test]
    fn refresh_replaces_contents() {
        let cache = FeedCache::new(5);
        cache.push(make_record(1, "A", "QUBIC", "10", "AddToBidOrder", 0));

        cache.refresh(vec![
            make_record(9, "C", "CFB", "30", "IssueAsset", 0),
            make_record(8, "B", "CFB", "20", "IssueAsset", 0),
        ]);

        let snapshot = cache.snapshot();
        assert_eq!(snapshot.len(), 2);
        let Some(first) = snapshot.first() else {
            panic!("snapshot should not be empty");
        };
        assert_eq!(first.id, 9);
    }
}

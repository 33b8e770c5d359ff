//! Bounded, deduplicated live event list.
//!
//! Two independent producers feed the live view: push notifications from
//! the [`super::EventBus`] and a periodic re-fetch from the store. Neither
//! coordinates with the other, so [`BoundedFeed`] is the consumer-side
//! merge stage: newest-first order, dedupe keyed on `tx_id`, and a fixed
//! capacity enforced by dropping the oldest tail entries.

use std::collections::VecDeque;

use super::event::EventRecord;

/// Fixed-capacity, newest-first event list with `tx_id` dedupe.
#[derive(Debug)]
pub struct BoundedFeed {
    capacity: usize,
    entries: VecDeque<EventRecord>,
}

impl BoundedFeed {
    /// Creates an empty feed holding at most `capacity` events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Prepends a freshly committed event.
    ///
    /// Returns `false` without modifying the list when an event with the
    /// same `tx_id` is already present (a push racing a poll of the same
    /// commit). The oldest entries are evicted past capacity.
    pub fn push_front(&mut self, event: EventRecord) -> bool {
        if self.contains_tx(&event.tx_id) {
            return false;
        }
        self.entries.push_front(event);
        self.entries.truncate(self.capacity);
        true
    }

    /// Replaces the list with a newest-first re-fetch result, truncated to
    /// capacity.
    pub fn refresh(&mut self, newest_first: Vec<EventRecord>) {
        self.entries = newest_first.into_iter().take(self.capacity).collect();
    }

    /// Whether an event with this `tx_id` is currently in the list.
    #[must_use]
    pub fn contains_tx(&self, tx_id: &str) -> bool {
        self.entries.iter().any(|e| e.tx_id == tx_id)
    }

    /// Current contents, newest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<EventRecord> {
        self.entries.iter().cloned().collect()
    }

    /// Number of events currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the feed holds no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured maximum length.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::event::tests::make_record;

    fn record(id: i64) -> EventRecord {
        make_record(id, "WALLET_A", "QUBIC", "100", "AddToBidOrder", 0)
    }

    #[test]
    fn push_keeps_newest_first_and_bounds_length() {
        let mut feed = BoundedFeed::new(5);
        for id in 1..=5 {
            assert!(feed.push_front(record(id)));
        }
        assert_eq!(feed.len(), 5);

        // A sixth insertion keeps the list at 5 with the new event first.
        assert!(feed.push_front(record(6)));
        let snapshot = feed.snapshot();
        assert_eq!(snapshot.len(), 5);
        let Some(first) = snapshot.first() else {
            panic!("feed should not be empty");
        };
        assert_eq!(first.id, 6);
        assert!(!feed.contains_tx("tx-1"));
    }

    #[test]
    fn duplicate_tx_id_is_not_surfaced_twice() {
        let mut feed = BoundedFeed::new(5);
        assert!(feed.push_front(record(1)));
        assert!(!feed.push_front(record(1)));
        assert_eq!(feed.len(), 1);
    }

    #[test]
    fn refresh_replaces_and_truncates() {
        let mut feed = BoundedFeed::new(3);
        feed.push_front(record(99));

        feed.refresh(vec![record(5), record(4), record(3), record(2)]);
        let snapshot = feed.snapshot();
        assert_eq!(snapshot.len(), 3);
        let Some(first) = snapshot.first() else {
            panic!("feed should not be empty");
        };
        assert_eq!(first.id, 5);
        assert!(!feed.contains_tx("tx-99"));
    }

    #[test]
    fn push_after_refresh_dedupes_against_fetched_rows() {
        let mut feed = BoundedFeed::new(10);
        feed.refresh(vec![record(2), record(1)]);
        assert!(!feed.push_front(record(2)));
        assert!(feed.push_front(record(3)));
        assert_eq!(feed.len(), 3);
    }

    #[test]
    fn zero_capacity_is_clamped_to_one() {
        let mut feed = BoundedFeed::new(0);
        assert!(feed.push_front(record(1)));
        assert_eq!(feed.capacity(), 1);
        assert_eq!(feed.len(), 1);
    }
}

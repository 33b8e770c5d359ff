//! Dashboard summary statistics as pure folds over an event slice.
//!
//! Every aggregate is a function of `(events, threshold snapshot)` with no
//! hidden state, so identical inputs always reproduce identical outputs.
//! Amount magnitudes come from [`parse_amount`] and whale decisions from
//! [`WhaleThresholds`] — never recomputed ad hoc.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::amount::parse_amount;
use super::event::{ActionCategory, EventRecord};
use super::whale::WhaleThresholds;

/// Number of activity buckets in the 24-hour window.
pub const ACTIVITY_BUCKET_COUNT: usize = 12;

/// Width of one activity bucket in milliseconds (2 hours).
pub const ACTIVITY_BUCKET_MILLIS: i64 = 2 * 60 * 60 * 1000;

/// Headline KPI aggregates over an event set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KpiStats {
    /// Number of events in the set.
    pub total_events: u64,
    /// Count of distinct source addresses.
    pub active_wallets: u64,
    /// Count of events (not wallets) classified as whale actions.
    pub whale_events: u64,
    /// Sum of parsed amounts across the set.
    pub total_volume: u64,
}

/// Computes the headline KPIs for an event set.
#[must_use]
pub fn kpi_stats(events: &[EventRecord], thresholds: &WhaleThresholds) -> KpiStats {
    let mut wallets: HashSet<&str> = HashSet::new();
    let mut whale_events = 0u64;
    let mut total_volume = 0u64;

    for event in events {
        wallets.insert(event.source_id.as_str());
        let amount = parse_amount(&event.amount);
        total_volume = total_volume.saturating_add(amount);
        if thresholds.is_whale(event.token(), amount) {
            whale_events += 1;
        }
    }

    KpiStats {
        total_events: events.len() as u64,
        active_wallets: wallets.len() as u64,
        whale_events,
        total_volume,
    }
}

/// One 2-hour slot of the 24-hour activity window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivityBucket {
    /// Bucket start, epoch milliseconds (inclusive).
    pub bucket_start: i64,
    /// Bucket end, epoch milliseconds (exclusive).
    pub bucket_end: i64,
    /// `AddToBidOrder` events.
    pub bids: u64,
    /// `AddToAskOrder` events.
    pub asks: u64,
    /// Share transfer events.
    pub transfers: u64,
    /// `IssueAsset` events.
    pub issues: u64,
    /// Order removal events.
    pub cancels: u64,
    /// All events in the bucket, including unknown procedure names.
    pub total: u64,
    /// Sum of parsed amounts in the bucket.
    pub volume: u64,
}

/// Partitions the 24 hours ending at `now_millis` into 12 contiguous
/// 2-hour buckets and folds the events into them.
///
/// Always returns exactly [`ACTIVITY_BUCKET_COUNT`] buckets; empty buckets
/// carry zero counts. Events outside `[now - 24h, now)` are ignored.
#[must_use]
pub fn activity_buckets(events: &[EventRecord], now_millis: i64) -> Vec<ActivityBucket> {
    let window_start = now_millis - (ACTIVITY_BUCKET_COUNT as i64) * ACTIVITY_BUCKET_MILLIS;

    let mut buckets: Vec<ActivityBucket> = (0..ACTIVITY_BUCKET_COUNT as i64)
        .map(|i| ActivityBucket {
            bucket_start: window_start + i * ACTIVITY_BUCKET_MILLIS,
            bucket_end: window_start + (i + 1) * ACTIVITY_BUCKET_MILLIS,
            ..ActivityBucket::default()
        })
        .collect();

    for event in events {
        if event.timestamp < window_start || event.timestamp >= now_millis {
            continue;
        }
        let index = ((event.timestamp - window_start) / ACTIVITY_BUCKET_MILLIS) as usize;
        let Some(bucket) = buckets.get_mut(index.min(ACTIVITY_BUCKET_COUNT - 1)) else {
            continue;
        };
        bucket.total += 1;
        bucket.volume = bucket.volume.saturating_add(parse_amount(&event.amount));
        match event.category() {
            Some(ActionCategory::Bid) => bucket.bids += 1,
            Some(ActionCategory::Ask) => bucket.asks += 1,
            Some(ActionCategory::Transfer) => bucket.transfers += 1,
            Some(ActionCategory::Issue) => bucket.issues += 1,
            Some(ActionCategory::Cancel) => bucket.cancels += 1,
            None => {}
        }
    }

    buckets
}

/// One wallet's summed volume for the top-wallets board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletVolume {
    /// Source wallet address.
    pub address: String,
    /// Sum of parsed amounts across the wallet's events.
    pub volume: u64,
    /// Number of events contributing to the sum.
    pub event_count: u64,
}

/// Groups events by source wallet, sums their volumes, and returns the top
/// `n` wallets by volume descending.
///
/// Ties keep first-encountered order (the grouping preserves the order in
/// which wallets first appear and the sort is stable).
#[must_use]
pub fn top_wallets(events: &[EventRecord], n: usize) -> Vec<WalletVolume> {
    let mut order: Vec<WalletVolume> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for event in events {
        let amount = parse_amount(&event.amount);
        if let Some(&i) = index.get(event.source_id.as_str()) {
            if let Some(entry) = order.get_mut(i) {
                entry.volume = entry.volume.saturating_add(amount);
                entry.event_count += 1;
            }
        } else {
            index.insert(event.source_id.as_str(), order.len());
            order.push(WalletVolume {
                address: event.source_id.clone(),
                volume: amount,
                event_count: 1,
            });
        }
    }

    order.sort_by(|a, b| b.volume.cmp(&a.volume));
    order.truncate(n);
    order
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::event::tests::make_record;

    #[test]
    fn kpi_on_empty_set_is_all_zero() {
        let stats = kpi_stats(&[], &WhaleThresholds::default());
        assert_eq!(
            stats,
            KpiStats {
                total_events: 0,
                active_wallets: 0,
                whale_events: 0,
                total_volume: 0,
            }
        );
    }

    #[test]
    fn kpi_counts_distinct_wallets_and_whale_events() {
        let thresholds = WhaleThresholds::default();
        let events = vec![
            make_record(1, "WALLET_A", "QUBIC", "2000000", "AddToBidOrder", 0),
            make_record(2, "WALLET_A", "QUBIC", "500", "AddToAskOrder", 0),
            make_record(3, "WALLET_B", "CFB", "50000", "AddToBidOrder", 0),
        ];
        let stats = kpi_stats(&events, &thresholds);
        assert_eq!(stats.total_events, 3);
        assert_eq!(stats.active_wallets, 2);
        // 2_000_000 QUBIC and 50_000 CFB both meet their thresholds.
        assert_eq!(stats.whale_events, 2);
        assert_eq!(stats.total_volume, 2_050_500);
    }

    #[test]
    fn twelve_buckets_even_when_empty() {
        let buckets = activity_buckets(&[], 86_400_000);
        assert_eq!(buckets.len(), ACTIVITY_BUCKET_COUNT);
        assert!(buckets.iter().all(|b| b.total == 0 && b.volume == 0));
    }

    #[test]
    fn buckets_are_contiguous_over_the_window() {
        let now = 1_704_067_200_000;
        let buckets = activity_buckets(&[], now);
        let Some(first) = buckets.first() else {
            panic!("expected buckets");
        };
        let Some(last) = buckets.last() else {
            panic!("expected buckets");
        };
        assert_eq!(first.bucket_start, now - 24 * 60 * 60 * 1000);
        assert_eq!(last.bucket_end, now);
        for pair in buckets.windows(2) {
            let (Some(a), Some(b)) = (pair.first(), pair.get(1)) else {
                panic!("expected bucket pair");
            };
            assert_eq!(a.bucket_end, b.bucket_start);
        }
    }

    #[test]
    fn events_land_in_their_slot_by_category() {
        let now = ACTIVITY_BUCKET_COUNT as i64 * ACTIVITY_BUCKET_MILLIS;
        let events = vec![
            // 1h into the window: bucket 0.
            make_record(1, "WALLET_A", "QUBIC", "100", "AddToBidOrder", ACTIVITY_BUCKET_MILLIS / 2),
            // Last bucket.
            make_record(2, "WALLET_B", "QUBIC", "200", "RemoveFromBidOrder", now - 1),
            // Outside the window entirely.
            make_record(3, "WALLET_C", "QUBIC", "999", "IssueAsset", now + 5),
        ];
        let buckets = activity_buckets(&events, now);
        let (Some(first), Some(last)) = (buckets.first(), buckets.last()) else {
            panic!("expected buckets");
        };
        assert_eq!(first.bids, 1);
        assert_eq!(first.volume, 100);
        assert_eq!(last.cancels, 1);
        let total: u64 = buckets.iter().map(|b| b.total).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn top_wallets_sums_and_orders_descending() {
        let events = vec![
            make_record(1, "A", "QUBIC", "100", "AddToBidOrder", 0),
            make_record(2, "B", "QUBIC", "300", "AddToBidOrder", 0),
            make_record(3, "A", "QUBIC", "50", "AddToBidOrder", 0),
        ];
        let top = top_wallets(&events, 5);
        let volumes: Vec<(&str, u64)> = top
            .iter()
            .map(|w| (w.address.as_str(), w.volume))
            .collect();
        assert_eq!(volumes, vec![("B", 300), ("A", 150)]);
    }

    #[test]
    fn top_wallets_ties_keep_first_encountered_order() {
        let events = vec![
            make_record(1, "A", "QUBIC", "100", "AddToBidOrder", 0),
            make_record(2, "B", "QUBIC", "100", "AddToBidOrder", 0),
            make_record(3, "C", "QUBIC", "100", "AddToBidOrder", 0),
        ];
        let top = top_wallets(&events, 2);
        let addresses: Vec<&str> = top.iter().map(|w| w.address.as_str()).collect();
        assert_eq!(addresses, vec!["A", "B"]);
    }
}

//! Whale classification against per-token configurable thresholds.
//!
//! A single classifier is injected into every consumer (event feed, wallet
//! roll-ups, KPI aggregates, alert evaluation) so classification logic and
//! thresholds cannot drift between views. The threshold map is shared
//! mutable state behind [`ThresholdStore`]; consumers take a snapshot per
//! evaluation and never cache one across a configuration change.

use std::collections::{BTreeMap, HashSet};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::amount::parse_amount;
use super::event::EventRecord;

/// Threshold applied to tokens without an explicit entry.
pub const DEFAULT_WHALE_THRESHOLD: u64 = 1_000_000;

/// Immutable snapshot of the per-token whale threshold map.
///
/// Token keys are stored upper-case; lookups are case-insensitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhaleThresholds {
    thresholds: BTreeMap<String, u64>,
}

impl Default for WhaleThresholds {
    /// Seeds the known-token defaults.
    fn default() -> Self {
        let mut map = Self {
            thresholds: BTreeMap::new(),
        };
        map.set("QUBIC", 1_000_000);
        map.set("QMINE", 500_000);
        map.set("GARTH", 100_000);
        map.set("MATILDA", 100_000);
        map.set("CFB", 50_000);
        map.set("QXMR", 10_000);
        map
    }
}

impl WhaleThresholds {
    /// Creates an empty threshold map (every token falls back to
    /// [`DEFAULT_WHALE_THRESHOLD`]).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            thresholds: BTreeMap::new(),
        }
    }

    /// Sets the threshold for a token. The key is upper-cased.
    pub fn set(&mut self, token: &str, amount: u64) {
        self.thresholds.insert(token.to_uppercase(), amount);
    }

    /// Returns the configured threshold for a token, or
    /// [`DEFAULT_WHALE_THRESHOLD`] when the token has no entry.
    #[must_use]
    pub fn threshold_for(&self, token: &str) -> u64 {
        self.thresholds
            .get(&token.to_uppercase())
            .copied()
            .unwrap_or(DEFAULT_WHALE_THRESHOLD)
    }

    /// Whether the given amount meets the token's threshold. The boundary
    /// is inclusive.
    #[must_use]
    pub fn is_whale(&self, token: &str, amount: u64) -> bool {
        amount >= self.threshold_for(token)
    }

    /// Whether a stored event classifies as a whale action.
    #[must_use]
    pub fn is_whale_event(&self, event: &EventRecord) -> bool {
        self.is_whale(event.token(), parse_amount(&event.amount))
    }

    /// Distinct source addresses with at least one whale event in the
    /// given sequence.
    #[must_use]
    pub fn whale_wallets_among(&self, events: &[EventRecord]) -> HashSet<String> {
        events
            .iter()
            .filter(|e| self.is_whale_event(e))
            .map(|e| e.source_id.clone())
            .collect()
    }

    /// Iterates over the configured `(token, amount)` entries in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, u64)> {
        self.thresholds.iter().map(|(t, a)| (t.as_str(), *a))
    }
}

/// Shared, process-wide threshold configuration.
///
/// Read by many aggregate computations, written only on explicit settings
/// updates. Reads clone the current map so an in-flight evaluation is
/// never torn by a concurrent replace.
#[derive(Debug)]
pub struct ThresholdStore {
    inner: RwLock<WhaleThresholds>,
}

impl ThresholdStore {
    /// Creates a store with the given initial map.
    #[must_use]
    pub fn new(initial: WhaleThresholds) -> Self {
        Self {
            inner: RwLock::new(initial),
        }
    }

    /// Returns a snapshot of the current threshold map.
    #[must_use]
    pub fn snapshot(&self) -> WhaleThresholds {
        self.inner.read().clone()
    }

    /// Replaces the whole threshold map.
    pub fn replace(&self, thresholds: WhaleThresholds) {
        *self.inner.write() = thresholds;
    }

    /// Updates a single token's threshold in place.
    pub fn set(&self, token: &str, amount: u64) {
        self.inner.write().set(token, amount);
    }
}

impl Default for ThresholdStore {
    fn default() -> Self {
        Self::new(WhaleThresholds::default())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::event::tests::make_record;

    #[test]
    fn lookup_is_case_insensitive() {
        let map = WhaleThresholds::default();
        assert_eq!(map.threshold_for("qubic"), map.threshold_for("QUBIC"));
        assert_eq!(map.threshold_for("QuBiC"), 1_000_000);
    }

    #[test]
    fn unknown_token_falls_back_to_default() {
        let map = WhaleThresholds::default();
        assert_eq!(map.threshold_for("NOPE"), DEFAULT_WHALE_THRESHOLD);
    }

    #[test]
    fn boundary_is_inclusive() {
        let mut map = WhaleThresholds::empty();
        map.set("CFB", 50_000);
        assert!(map.is_whale("CFB", 50_000));
        assert!(!map.is_whale("CFB", 49_999));
    }

    #[test]
    fn whale_wallets_deduplicates_sources() {
        let map = WhaleThresholds::default();
        let events = vec![
            make_record(1, "WALLET_A", "QUBIC", "2000000", "AddToBidOrder", 0),
            make_record(2, "WALLET_A", "QUBIC", "3000000", "AddToBidOrder", 0),
            make_record(3, "WALLET_B", "QUBIC", "10", "AddToBidOrder", 0),
        ];
        let whales = map.whale_wallets_among(&events);
        assert_eq!(whales.len(), 1);
        assert!(whales.contains("WALLET_A"));
    }

    #[test]
    fn eventless_asset_name_classifies_as_native() {
        let map = WhaleThresholds::default();
        let record = make_record(1, "WALLET_A", "", "1000000", "AddToBidOrder", 0);
        assert!(map.is_whale_event(&record));
    }

    #[test]
    fn store_replace_is_visible_to_next_snapshot() {
        let store = ThresholdStore::default();
        assert!(store.snapshot().is_whale("QXMR", 10_000));

        let mut updated = WhaleThresholds::empty();
        updated.set("QXMR", 99_000);
        store.replace(updated);

        // No stale cache: the next evaluation sees the new map.
        assert!(!store.snapshot().is_whale("QXMR", 10_000));
        assert!(store.snapshot().is_whale("QXMR", 99_000));
    }
}

//! Event service: orchestrates ingestion, queries and whale alerts.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use crate::domain::aggregates::{self, ActivityBucket, KpiStats, WalletVolume};
use crate::domain::normalizer;
use crate::domain::whale::ThresholdStore;
use crate::domain::{EventBus, EventRecord};
use crate::error::QxError;
use crate::notify::NotificationHub;
use crate::persistence::{DuplicatePolicy, EventStore, WalletRecord};

/// Number of top wallets reported by the leaderboard query.
const TOP_WALLET_COUNT: usize = 5;

/// Length of the rolling window used by the stats queries, in millis.
const STATS_WINDOW_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Result of ingesting one webhook delivery.
#[derive(Debug, Clone)]
pub struct IngestReport {
    /// Database ids of the events the delivery resolved to, in payload
    /// order. An id appears whether the event was freshly inserted or
    /// matched an already stored `tx_id`.
    pub event_ids: Vec<i64>,
}

/// Orchestration layer for event ingestion and read queries.
///
/// Stateless coordinator: owns references to the [`EventStore`] for
/// durable state and the [`EventBus`] for live fan-out. Ingestion
/// follows the pattern: normalize record, upsert event, best-effort
/// wallet upsert, publish on the bus when the event is new.
#[derive(Debug, Clone)]
pub struct EventService {
    store: EventStore,
    event_bus: EventBus,
    thresholds: Arc<ThresholdStore>,
    notifier: Arc<NotificationHub>,
    duplicate_policy: DuplicatePolicy,
    whale_alerts_enabled: bool,
}

impl EventService {
    /// Creates a new `EventService`.
    #[must_use]
    pub fn new(
        store: EventStore,
        event_bus: EventBus,
        thresholds: Arc<ThresholdStore>,
        notifier: Arc<NotificationHub>,
        duplicate_policy: DuplicatePolicy,
        whale_alerts_enabled: bool,
    ) -> Self {
        Self {
            store,
            event_bus,
            thresholds,
            notifier,
            duplicate_policy,
            whale_alerts_enabled,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns a reference to the shared threshold store.
    #[must_use]
    pub fn thresholds(&self) -> &Arc<ThresholdStore> {
        &self.thresholds
    }

    /// Returns a reference to the notification hub.
    #[must_use]
    pub fn notifier(&self) -> &Arc<NotificationHub> {
        &self.notifier
    }

    /// Ingests a webhook delivery (single object or array of records).
    ///
    /// Records are processed in payload order. The first record that
    /// fails normalization or storage aborts the batch; events committed
    /// before the failure stay committed.
    ///
    /// # Errors
    ///
    /// Returns a [`QxError`] if the body is neither an object nor an
    /// array, if a record is missing a required field, or if the store
    /// rejects an insert.
    pub async fn ingest(&self, body: &Value) -> Result<IngestReport, QxError> {
        let records = normalizer::records(body)?;
        let mut event_ids = Vec::with_capacity(records.len());

        for record in records {
            // Shape mix is worth watching: it tells us which watcher
            // generation is still delivering.
            let shape = if record.get("RawTransaction").is_some() {
                "nested"
            } else {
                "flat"
            };
            let draft = normalizer::normalize_record(record)?;
            let outcome = self.store.insert_event(&draft, self.duplicate_policy).await?;
            event_ids.push(outcome.event_id());

            // Wallet recency tracking never fails the delivery.
            if let Err(e) = self.store.upsert_wallet(&draft.source_id).await {
                tracing::warn!(wallet = %draft.source_id, error = %e, "wallet upsert failed");
            }

            if outcome.is_new() {
                let event = EventRecord::from_draft(&draft, outcome.event_id(), Utc::now());
                tracing::info!(
                    tx_id = %event.tx_id,
                    token = %event.token(),
                    amount = %event.amount,
                    shape,
                    "event stored"
                );
                let _ = self.event_bus.publish(event.clone());
                self.maybe_alert(&event);
            } else {
                tracing::debug!(tx_id = %draft.tx_id, "duplicate delivery resolved");
            }
        }

        Ok(IngestReport { event_ids })
    }

    /// Returns the most recent events, newest first.
    ///
    /// # Errors
    ///
    /// Returns a [`QxError`] if the query fails.
    pub async fn recent(&self, limit: i64) -> Result<Vec<EventRecord>, QxError> {
        self.store.list_recent(limit).await
    }

    /// Returns events where `address` is the source or destination.
    ///
    /// # Errors
    ///
    /// Returns a [`QxError`] if the query fails.
    pub async fn by_wallet(
        &self,
        address: &str,
        limit: i64,
    ) -> Result<Vec<EventRecord>, QxError> {
        self.store.list_by_wallet(address, limit).await
    }

    /// Returns known wallets ordered by recency.
    ///
    /// # Errors
    ///
    /// Returns a [`QxError`] if the query fails.
    pub async fn wallets(&self, limit: i64) -> Result<Vec<WalletRecord>, QxError> {
        self.store.list_wallets(limit).await
    }

    /// Computes KPI stats over the last 24 hours of events.
    ///
    /// # Errors
    ///
    /// Returns a [`QxError`] if the query fails.
    pub async fn kpi_stats(&self) -> Result<KpiStats, QxError> {
        let events = self.window_events().await?;
        let thresholds = self.thresholds.snapshot();
        Ok(aggregates::kpi_stats(&events, &thresholds))
    }

    /// Computes the 2-hour activity buckets over the last 24 hours.
    ///
    /// # Errors
    ///
    /// Returns a [`QxError`] if the query fails.
    pub async fn activity(&self) -> Result<Vec<ActivityBucket>, QxError> {
        let events = self.window_events().await?;
        Ok(aggregates::activity_buckets(&events, Utc::now().timestamp_millis()))
    }

    /// Computes the top-wallet leaderboard over the last 24 hours.
    ///
    /// # Errors
    ///
    /// Returns a [`QxError`] if the query fails.
    pub async fn top_wallets(&self) -> Result<Vec<WalletVolume>, QxError> {
        let events = self.window_events().await?;
        Ok(aggregates::top_wallets(&events, TOP_WALLET_COUNT))
    }

    async fn window_events(&self) -> Result<Vec<EventRecord>, QxError> {
        let since = Utc::now().timestamp_millis().saturating_sub(STATS_WINDOW_MILLIS);
        self.store.list_since(since).await
    }

    /// Fires a whale alert for the event if alerts are enabled and the
    /// event meets its token's threshold. Delivery is detached from the
    /// request path.
    fn maybe_alert(&self, event: &EventRecord) {
        if !self.whale_alerts_enabled {
            return;
        }
        let thresholds = self.thresholds.snapshot();
        if !thresholds.is_whale_event(event) {
            return;
        }

        let message = render_whale_alert(event);
        let notifier = Arc::clone(&self.notifier);
        tracing::info!(tx_id = %event.tx_id, token = %event.token(), "whale alert triggered");
        tokio::spawn(async move {
            let _ = notifier.dispatch(&message).await;
        });
    }
}

/// Renders the human-readable whale alert text for an event.
fn render_whale_alert(event: &EventRecord) -> String {
    format!(
        "🐋 Whale {action}: {amount} {token}\nfrom {source}\nto {dest}\ntick {tick} | tx {tx}",
        action = event
            .category()
            .map_or("activity", |c| c.as_str()),
        amount = event.amount,
        token = event.token(),
        source = event.source_id,
        dest = event.dest_id,
        tick = event.tick_number,
        tx = event.tx_id,
    )
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::event::tests::make_record;

    #[test]
    fn whale_alert_text_includes_token_and_amount() {
        let event = make_record(1, "SRCWALLET", "QMINE", "750000", "AddToBidOrder", 0);
        let text = render_whale_alert(&event);
        assert!(text.contains("750000 QMINE"));
        assert!(text.contains("SRCWALLET"));
        assert!(text.contains("bid"));
    }

    #[test]
    fn whale_alert_falls_back_to_native_token() {
        let event = make_record(2, "A", "", "5000000", "TransferShareOwnershipAndPossession", 0);
        let text = render_whale_alert(&event);
        assert!(text.contains("QUBIC"));
    }
}

//! PostgreSQL implementation of the event store.

use std::str::FromStr;

use sqlx::PgPool;

use super::models::WalletRecord;
use crate::domain::{EventDraft, EventRecord};
use crate::error::QxError;

/// Columns read back for event rows. `raw_payload` is deliberately
/// excluded from list reads; it exists for audits.
const EVENT_COLUMNS: &str = "id, tx_id, procedure_type_value, procedure_type_name, source_id, \
     dest_id, amount, tick_number, \"timestamp\", money_flew, issuer_address, asset_name, \
     price, number_of_shares, created_at";

/// What to do when an insert hits an existing `tx_id`.
///
/// Both behaviors exist in the watcher's history; neither is universally
/// correct, so the choice is an explicit configuration switch
/// (`DUPLICATE_POLICY`) rather than a silent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Overwrite the existing row's fields with the incoming values.
    /// Use when retries are expected to carry corrected data.
    #[default]
    Merge,
    /// Keep the existing row untouched; the duplicate is treated as
    /// already handled, not an error.
    Skip,
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "merge" => Ok(Self::Merge),
            "skip" => Ok(Self::Skip),
            other => Err(format!("unknown duplicate policy: {other}")),
        }
    }
}

/// Result of writing one event draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A fresh row was created with this id.
    Inserted(i64),
    /// A row with the same `tx_id` already existed. Under
    /// [`DuplicatePolicy::Merge`] its fields were overwritten in place;
    /// under [`DuplicatePolicy::Skip`] it was left untouched. Either way
    /// the event itself is not new.
    AlreadyStored(i64),
}

impl InsertOutcome {
    /// The id of the row backing this `tx_id`, new or pre-existing.
    #[must_use]
    pub const fn event_id(&self) -> i64 {
        match self {
            Self::Inserted(id) | Self::AlreadyStored(id) => *id,
        }
    }

    /// Whether this write changed the table.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        matches!(self, Self::Inserted(_))
    }
}

/// PostgreSQL-backed event store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct EventStore {
    pool: PgPool,
}

impl EventStore {
    /// Creates a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persists an event draft with at-most-one-row-per-`tx_id` semantics.
    ///
    /// # Errors
    ///
    /// Returns [`QxError::Persistence`] on database failure.
    pub async fn insert_event(
        &self,
        draft: &EventDraft,
        policy: DuplicatePolicy,
    ) -> Result<InsertOutcome, QxError> {
        match policy {
            DuplicatePolicy::Merge => self.insert_merge(draft).await,
            DuplicatePolicy::Skip => self.insert_skip(draft).await,
        }
    }

    async fn insert_merge(&self, draft: &EventDraft) -> Result<InsertOutcome, QxError> {
        // `xmax = 0` distinguishes a fresh insert from a conflict-update:
        // an updated row carries the deleting transaction's id in xmax.
        let (id, fresh) = bind_draft(
            sqlx::query_as::<_, (i64, bool)>(
                "INSERT INTO qx_events (tx_id, procedure_type_value, procedure_type_name, \
                 source_id, dest_id, amount, tick_number, \"timestamp\", money_flew, \
                 issuer_address, asset_name, price, number_of_shares, raw_payload) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
                 ON CONFLICT (tx_id) DO UPDATE SET \
                 procedure_type_value = EXCLUDED.procedure_type_value, \
                 procedure_type_name = EXCLUDED.procedure_type_name, \
                 source_id = EXCLUDED.source_id, dest_id = EXCLUDED.dest_id, \
                 amount = EXCLUDED.amount, tick_number = EXCLUDED.tick_number, \
                 \"timestamp\" = EXCLUDED.\"timestamp\", money_flew = EXCLUDED.money_flew, \
                 issuer_address = EXCLUDED.issuer_address, asset_name = EXCLUDED.asset_name, \
                 price = EXCLUDED.price, number_of_shares = EXCLUDED.number_of_shares, \
                 raw_payload = EXCLUDED.raw_payload \
                 RETURNING id, (xmax = 0)",
            ),
            draft,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| QxError::Persistence(e.to_string()))?;

        Ok(merge_outcome(id, fresh))
    }

    async fn insert_skip(&self, draft: &EventDraft) -> Result<InsertOutcome, QxError> {
        let inserted = bind_draft(
            sqlx::query_as::<_, (i64,)>(
                "INSERT INTO qx_events (tx_id, procedure_type_value, procedure_type_name, \
                 source_id, dest_id, amount, tick_number, \"timestamp\", money_flew, \
                 issuer_address, asset_name, price, number_of_shares, raw_payload) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
                 ON CONFLICT (tx_id) DO NOTHING \
                 RETURNING id",
            ),
            draft,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| QxError::Persistence(e.to_string()))?;

        if let Some((id,)) = inserted {
            return Ok(InsertOutcome::Inserted(id));
        }

        let existing = sqlx::query_scalar::<_, i64>("SELECT id FROM qx_events WHERE tx_id = $1")
            .bind(&draft.tx_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| QxError::Persistence(e.to_string()))?;

        Ok(InsertOutcome::AlreadyStored(existing))
    }

    /// Inserts or refreshes the recency row for a wallet address.
    ///
    /// # Errors
    ///
    /// Returns [`QxError::Persistence`] on database failure. Callers treat
    /// this as best-effort: the event row is the authoritative artifact.
    pub async fn upsert_wallet(&self, address: &str) -> Result<(), QxError> {
        sqlx::query(
            "INSERT INTO wallets (address, first_seen_at, last_seen_at, event_count) \
             VALUES ($1, now(), now(), 1) \
             ON CONFLICT (address) DO UPDATE SET \
             last_seen_at = now(), event_count = wallets.event_count + 1",
        )
        .bind(address)
        .execute(&self.pool)
        .await
        .map_err(|e| QxError::Persistence(e.to_string()))?;

        Ok(())
    }

    /// Returns up to `limit` events, newest insertion first.
    ///
    /// Ordered by row id, not tick number: ticks are not guaranteed
    /// strictly increasing across concurrent sources.
    ///
    /// # Errors
    ///
    /// Returns [`QxError::Persistence`] on database failure.
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<EventRecord>, QxError> {
        sqlx::query_as::<_, EventRecord>(&format!(
            "SELECT {EVENT_COLUMNS} FROM qx_events ORDER BY id DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| QxError::Persistence(e.to_string()))
    }

    /// Returns up to `limit` events where the wallet is source or
    /// destination, newest insertion first.
    ///
    /// # Errors
    ///
    /// Returns [`QxError::Persistence`] on database failure.
    pub async fn list_by_wallet(
        &self,
        address: &str,
        limit: i64,
    ) -> Result<Vec<EventRecord>, QxError> {
        sqlx::query_as::<_, EventRecord>(&format!(
            "SELECT {EVENT_COLUMNS} FROM qx_events \
             WHERE source_id = $1 OR dest_id = $1 ORDER BY id DESC LIMIT $2"
        ))
        .bind(address)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| QxError::Persistence(e.to_string()))
    }

    /// Returns all events with an event timestamp at or after `since`
    /// (epoch milliseconds), newest insertion first.
    ///
    /// # Errors
    ///
    /// Returns [`QxError::Persistence`] on database failure.
    pub async fn list_since(&self, since: i64) -> Result<Vec<EventRecord>, QxError> {
        sqlx::query_as::<_, EventRecord>(&format!(
            "SELECT {EVENT_COLUMNS} FROM qx_events \
             WHERE \"timestamp\" >= $1 ORDER BY id DESC"
        ))
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| QxError::Persistence(e.to_string()))
    }

    /// Returns up to `limit` wallet recency rows, most recently seen first.
    ///
    /// # Errors
    ///
    /// Returns [`QxError::Persistence`] on database failure.
    pub async fn list_wallets(&self, limit: i64) -> Result<Vec<WalletRecord>, QxError> {
        sqlx::query_as::<_, WalletRecord>(
            "SELECT address, first_seen_at, last_seen_at, event_count \
             FROM wallets ORDER BY last_seen_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| QxError::Persistence(e.to_string()))
    }
}

/// Maps the merge upsert's `(id, xmax = 0)` row to an outcome. Only a
/// fresh insert counts as new; a conflict-update is a redelivery.
const fn merge_outcome(id: i64, fresh: bool) -> InsertOutcome {
    if fresh {
        InsertOutcome::Inserted(id)
    } else {
        InsertOutcome::AlreadyStored(id)
    }
}

/// Binds the fourteen draft columns in declaration order.
fn bind_draft<'q, O>(
    query: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    draft: &'q EventDraft,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    query
        .bind(&draft.tx_id)
        .bind(draft.procedure_type_value)
        .bind(&draft.procedure_type_name)
        .bind(&draft.source_id)
        .bind(&draft.dest_id)
        .bind(&draft.amount)
        .bind(draft.tick_number)
        .bind(draft.timestamp)
        .bind(draft.money_flew)
        .bind(&draft.issuer_address)
        .bind(&draft.asset_name)
        .bind(draft.price)
        .bind(draft.number_of_shares)
        .bind(&draft.raw_payload)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_policy_parses_case_insensitively() {
        assert_eq!(DuplicatePolicy::from_str("merge"), Ok(DuplicatePolicy::Merge));
        assert_eq!(DuplicatePolicy::from_str("SKIP"), Ok(DuplicatePolicy::Skip));
        assert!(DuplicatePolicy::from_str("upsert").is_err());
    }

    #[test]
    fn outcome_exposes_id_and_novelty() {
        let outcome = InsertOutcome::Inserted(7);
        assert_eq!(outcome.event_id(), 7);
        assert!(outcome.is_new());

        let outcome = InsertOutcome::AlreadyStored(7);
        assert_eq!(outcome.event_id(), 7);
        assert!(!outcome.is_new());
    }

    #[test]
    fn merge_conflict_update_is_not_new() {
        // A redelivered tx_id under Merge overwrites the row but must not
        // look like a fresh event, or it would be re-published downstream.
        assert_eq!(merge_outcome(9, true), InsertOutcome::Inserted(9));
        assert_eq!(merge_outcome(9, false), InsertOutcome::AlreadyStored(9));
        assert!(!merge_outcome(9, false).is_new());
    }
}

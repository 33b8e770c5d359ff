//! Canonical QX event types.
//!
//! The normalizer converges both historical webhook payload shapes onto
//! [`EventDraft`]; the store assigns an id and creation timestamp to produce
//! an [`EventRecord`], which is the type every downstream consumer (feed,
//! aggregates, WebSocket broadcast) operates on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Token symbol assumed when an event carries no asset name.
pub const NATIVE_TOKEN: &str = "QUBIC";

/// Coarse action category used by the activity aggregates.
///
/// Both order-removal procedures collapse into [`ActionCategory::Cancel`],
/// and both share-transfer procedures into [`ActionCategory::Transfer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionCategory {
    /// `AddToBidOrder`.
    Bid,
    /// `AddToAskOrder`.
    Ask,
    /// `TransferShareOwnershipAndPossession` or
    /// `TransferShareManagementRights`.
    Transfer,
    /// `IssueAsset`.
    Issue,
    /// `RemoveFromAskOrder` or `RemoveFromBidOrder`.
    Cancel,
}

impl ActionCategory {
    /// Maps a QX procedure name to its category.
    ///
    /// Unknown procedure names return `None`; they are stored verbatim but
    /// do not contribute to category counts.
    #[must_use]
    pub fn from_procedure(name: &str) -> Option<Self> {
        match name {
            "AddToBidOrder" => Some(Self::Bid),
            "AddToAskOrder" => Some(Self::Ask),
            "TransferShareOwnershipAndPossession" | "TransferShareManagementRights" => {
                Some(Self::Transfer)
            }
            "IssueAsset" => Some(Self::Issue),
            "RemoveFromAskOrder" | "RemoveFromBidOrder" => Some(Self::Cancel),
            _ => None,
        }
    }

    /// Category name as used in aggregates and alert text.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bid => "bid",
            Self::Ask => "ask",
            Self::Transfer => "transfer",
            Self::Issue => "issue",
            Self::Cancel => "cancel",
        }
    }
}

/// A normalized exchange event before it has been persisted.
///
/// Produced by [`crate::domain::normalizer`]; identical to [`EventRecord`]
/// minus the store-assigned `id` and `created_at`. Optional payload fields
/// that were absent come through as empty strings or `None`, never as a
/// normalization failure.
#[derive(Debug, Clone, Serialize)]
pub struct EventDraft {
    /// Natural idempotency key. Supplied by nested-shape payloads,
    /// synthesized for flat-shape payloads.
    pub tx_id: String,
    /// Integer code of the action kind, as sent by the watcher.
    pub procedure_type_value: i32,
    /// Procedure name, stored verbatim (see [`ActionCategory`]).
    pub procedure_type_name: String,
    /// Source wallet address.
    pub source_id: String,
    /// Destination wallet address (may be empty).
    pub dest_id: String,
    /// String-encoded integer magnitude (may be empty).
    pub amount: String,
    /// Chain tick the transaction was observed at. Monotonic per source
    /// but not globally ordered.
    pub tick_number: i64,
    /// Event timestamp in epoch milliseconds.
    pub timestamp: i64,
    /// Money-flow flag from the payload, when present.
    pub money_flew: Option<bool>,
    /// Issuer address from the parsed transaction (may be empty).
    pub issuer_address: String,
    /// Token symbol from the parsed transaction (may be empty).
    pub asset_name: String,
    /// Order price, when present.
    pub price: Option<f64>,
    /// Number of shares, when present.
    pub number_of_shares: Option<i64>,
    /// Original inbound payload, retained verbatim for auditability.
    pub raw_payload: serde_json::Value,
}

/// A persisted exchange event, as read back from the `qx_events` table.
///
/// The raw payload column is written at insert time but not read back into
/// list responses; use the database directly for audits.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    /// Store-assigned row id. Insertion order, used for newest-first reads.
    pub id: i64,
    /// Natural idempotency key, unique.
    pub tx_id: String,
    /// Integer code of the action kind.
    pub procedure_type_value: i32,
    /// Procedure name, verbatim.
    pub procedure_type_name: String,
    /// Source wallet address.
    pub source_id: String,
    /// Destination wallet address (may be empty).
    pub dest_id: String,
    /// String-encoded integer magnitude (may be empty).
    pub amount: String,
    /// Chain tick the transaction was observed at.
    pub tick_number: i64,
    /// Event timestamp in epoch milliseconds.
    pub timestamp: i64,
    /// Money-flow flag, when the payload carried one.
    pub money_flew: Option<bool>,
    /// Issuer address (may be empty).
    pub issuer_address: String,
    /// Token symbol (may be empty).
    pub asset_name: String,
    /// Order price, when present.
    pub price: Option<f64>,
    /// Number of shares, when present.
    pub number_of_shares: Option<i64>,
    /// Server-side insertion timestamp.
    pub created_at: DateTime<Utc>,
}

impl EventRecord {
    /// Builds the record for a freshly committed draft.
    #[must_use]
    pub fn from_draft(draft: &EventDraft, id: i64, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            tx_id: draft.tx_id.clone(),
            procedure_type_value: draft.procedure_type_value,
            procedure_type_name: draft.procedure_type_name.clone(),
            source_id: draft.source_id.clone(),
            dest_id: draft.dest_id.clone(),
            amount: draft.amount.clone(),
            tick_number: draft.tick_number,
            timestamp: draft.timestamp,
            money_flew: draft.money_flew,
            issuer_address: draft.issuer_address.clone(),
            asset_name: draft.asset_name.clone(),
            price: draft.price,
            number_of_shares: draft.number_of_shares,
            created_at,
        }
    }

    /// Token symbol for classification: the asset name, or
    /// [`NATIVE_TOKEN`] when the event carries none.
    #[must_use]
    pub fn token(&self) -> &str {
        if self.asset_name.is_empty() {
            NATIVE_TOKEN
        } else {
            &self.asset_name
        }
    }

    /// Action category of this event, if the procedure name is known.
    #[must_use]
    pub fn category(&self) -> Option<ActionCategory> {
        ActionCategory::from_procedure(&self.procedure_type_name)
    }
}

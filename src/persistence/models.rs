//! Database models for wallet recency rows.
//!
//! Event rows deserialize straight into
//! [`crate::domain::EventRecord`]; only the wallet roll-up needs its own
//! model here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A wallet recency row from the `wallets` table.
///
/// Created on the first event from an address, updated on every
/// subsequent one, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WalletRecord {
    /// Wallet address (primary key).
    pub address: String,
    /// When the address was first seen as an event source.
    pub first_seen_at: DateTime<Utc>,
    /// When the address was most recently seen as an event source.
    pub last_seen_at: DateTime<Utc>,
    /// Number of events recorded from this address.
    pub event_count: i64,
}

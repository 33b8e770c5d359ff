//! Wallet directory DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::persistence::WalletRecord;

/// One known wallet as served by `GET /wallets`.
#[derive(Debug, Serialize, ToSchema)]
pub struct WalletDto {
    /// Wallet address.
    pub address: String,
    /// When the wallet was first observed.
    pub first_seen_at: DateTime<Utc>,
    /// When the wallet last appeared as an event source.
    pub last_seen_at: DateTime<Utc>,
    /// Number of events the wallet has originated.
    pub event_count: i64,
}

impl From<WalletRecord> for WalletDto {
    fn from(record: WalletRecord) -> Self {
        Self {
            address: record.address,
            first_seen_at: record.first_seen_at,
            last_seen_at: record.last_seen_at,
            event_count: record.event_count,
        }
    }
}

/// Response body for `GET /wallets`.
#[derive(Debug, Serialize, ToSchema)]
pub struct WalletListResponse {
    /// Wallets, most recently seen first.
    pub data: Vec<WalletDto>,
    /// Number of wallets returned.
    pub count: usize,
}

impl WalletListResponse {
    /// Wraps a recency-ordered wallet list.
    #[must_use]
    pub fn from_records(records: Vec<WalletRecord>) -> Self {
        let data: Vec<WalletDto> = records.into_iter().map(WalletDto::from).collect();
        let count = data.len();
        Self { data, count }
    }
}

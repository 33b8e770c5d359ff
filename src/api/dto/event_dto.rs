//! Event list and live feed DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::EventRecord;

/// One exchange event as served by the list and feed endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventDto {
    /// Store-assigned event id.
    pub id: i64,
    /// Transaction idempotency key.
    pub tx_id: String,
    /// Integer code of the action kind.
    pub procedure_type_value: i32,
    /// Procedure name, verbatim.
    pub procedure_type_name: String,
    /// Source wallet address.
    pub source_id: String,
    /// Destination wallet address (may be empty).
    pub dest_id: String,
    /// String-encoded integer magnitude.
    pub amount: String,
    /// Chain tick the transaction was observed at.
    pub tick_number: i64,
    /// Event timestamp in epoch milliseconds.
    pub timestamp: i64,
    /// Money-flow flag, when the payload carried one.
    pub money_flew: Option<bool>,
    /// Issuer address (may be empty).
    pub issuer_address: String,
    /// Token symbol; the native token when the event carried none.
    pub asset_name: String,
    /// Order price, when present.
    pub price: Option<f64>,
    /// Number of shares, when present.
    pub number_of_shares: Option<i64>,
    /// Server-side insertion timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<EventRecord> for EventDto {
    fn from(record: EventRecord) -> Self {
        let asset_name = record.token().to_string();
        Self {
            id: record.id,
            tx_id: record.tx_id,
            procedure_type_value: record.procedure_type_value,
            procedure_type_name: record.procedure_type_name,
            source_id: record.source_id,
            dest_id: record.dest_id,
            amount: record.amount,
            tick_number: record.tick_number,
            timestamp: record.timestamp,
            money_flew: record.money_flew,
            issuer_address: record.issuer_address,
            asset_name,
            price: record.price,
            number_of_shares: record.number_of_shares,
            created_at: record.created_at,
        }
    }
}

/// Response body for the event list endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventListResponse {
    /// Events, newest first.
    pub data: Vec<EventDto>,
    /// Number of events returned.
    pub count: usize,
}

impl EventListResponse {
    /// Wraps a newest-first record list.
    #[must_use]
    pub fn from_records(records: Vec<EventRecord>) -> Self {
        let data: Vec<EventDto> = records.into_iter().map(EventDto::from).collect();
        let count = data.len();
        Self { data, count }
    }
}

/// Query parameters for list endpoints.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ListParams {
    /// Maximum number of items to return (max 1000). Defaults to the
    /// configured list limit.
    #[serde(default)]
    pub limit: Option<i64>,
}

impl ListParams {
    /// Resolves the effective limit against the configured default.
    #[must_use]
    pub fn effective_limit(&self, default_limit: i64) -> i64 {
        self.limit.unwrap_or(default_limit).clamp(1, 1000)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::event::tests::make_record;

    #[test]
    fn dto_substitutes_native_token_for_empty_asset() {
        let dto = EventDto::from(make_record(1, "A", "", "100", "AddToBidOrder", 0));
        assert_eq!(dto.asset_name, "QUBIC");

        let dto = EventDto::from(make_record(2, "A", "CFB", "100", "AddToBidOrder", 0));
        assert_eq!(dto.asset_name, "CFB");
    }

    #[test]
    fn limit_falls_back_and_clamps() {
        let params = ListParams { limit: None };
        assert_eq!(params.effective_limit(100), 100);

        let params = ListParams { limit: Some(25) };
        assert_eq!(params.effective_limit(100), 25);

        let params = ListParams { limit: Some(50_000) };
        assert_eq!(params.effective_limit(100), 1000);

        let params = ListParams { limit: Some(0) };
        assert_eq!(params.effective_limit(100), 1);
    }
}

//! Webhook response DTOs.
//!
//! The ingestion webhook keeps the contract its upstream watcher was
//! built against: `{"success": true, ...}` on 200 and
//! `{"success": false, "error": ...}` on 500, for every failure class.

use serde::Serialize;
use utoipa::ToSchema;

/// Success body for `POST /webhook`.
///
/// Single-object deliveries carry `event_id`; array deliveries carry
/// `results` with one id per record in payload order.
#[derive(Debug, Serialize, ToSchema)]
pub struct WebhookSuccess {
    /// Always `true`.
    pub success: bool,
    /// Id of the stored event (single-object deliveries).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<i64>,
    /// Ids of the stored events (array deliveries).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<i64>>,
    /// Human-readable confirmation.
    pub message: String,
}

impl WebhookSuccess {
    /// Response for a single-object delivery.
    #[must_use]
    pub fn single(event_id: i64) -> Self {
        Self {
            success: true,
            event_id: Some(event_id),
            results: None,
            message: "event processed".to_string(),
        }
    }

    /// Response for an array delivery.
    #[must_use]
    pub fn batch(event_ids: Vec<i64>) -> Self {
        let message = format!("{} events processed", event_ids.len());
        Self {
            success: true,
            event_id: None,
            results: Some(event_ids),
            message,
        }
    }
}

/// Failure body for `POST /webhook`. Always served with status 500.
#[derive(Debug, Serialize, ToSchema)]
pub struct WebhookError {
    /// Always `false`.
    pub success: bool,
    /// Failure description.
    pub error: String,
}

impl WebhookError {
    /// Builds the failure body for any webhook error.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn single_response_carries_event_id_only() {
        let Ok(json) = serde_json::to_value(WebhookSuccess::single(42)) else {
            panic!("serialization should succeed");
        };
        assert_eq!(json["success"], true);
        assert_eq!(json["event_id"], 42);
        assert!(json.get("results").is_none());
    }

    #[test]
    fn batch_response_carries_results_only() {
        let Ok(json) = serde_json::to_value(WebhookSuccess::batch(vec![1, 2, 3])) else {
            panic!("serialization should succeed");
        };
        assert_eq!(json["success"], true);
        assert!(json.get("event_id").is_none());
        assert_eq!(json["results"], serde_json::json!([1, 2, 3]));
        assert_eq!(json["message"], "3 events processed");
    }

    #[test]
    fn error_response_is_flagged_unsuccessful() {
        let Ok(json) = serde_json::to_value(WebhookError::new("boom")) else {
            panic!("serialization should succeed");
        };
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "boom");
    }
}

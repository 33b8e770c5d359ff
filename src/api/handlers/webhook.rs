//! Ingestion webhook handler.
//!
//! The upstream chain watcher was built against a fixed contract:
//! 200 with `{"success": true, ...}` when the delivery was processed,
//! 500 with `{"success": false, "error": ...}` for every failure,
//! including malformed JSON and validation errors. The handler therefore
//! reads the raw body and converts errors itself instead of going
//! through [`crate::error::QxError`]'s `IntoResponse`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{WebhookError, WebhookSuccess};
use crate::app_state::AppState;

/// `POST /webhook` — Ingest one event or an array of events.
#[utoipa::path(
    post,
    path = "/webhook",
    tag = "Webhook",
    summary = "Ingest exchange events",
    description = "Accepts a single event object or an array of events from the chain watcher. Deliveries are idempotent on `txId`: a redelivered transaction resolves to its stored event instead of a duplicate.",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Delivery processed", body = WebhookSuccess),
        (status = 500, description = "Delivery rejected", body = WebhookError),
    )
)]
pub async fn receive_webhook(State(state): State<AppState>, body: String) -> impl IntoResponse {
    let payload: serde_json::Value = match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "webhook delivery is not valid JSON");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(WebhookError::new(format!("invalid JSON: {e}"))),
            )
                .into_response();
        }
    };

    let was_array = payload.is_array();
    match state.event_service.ingest(&payload).await {
        Ok(report) => {
            let response = if was_array {
                WebhookSuccess::batch(report.event_ids)
            } else {
                match report.event_ids.first() {
                    Some(&id) => WebhookSuccess::single(id),
                    None => WebhookSuccess::batch(Vec::new()),
                }
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "webhook ingestion failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(WebhookError::new(e.to_string())),
            )
                .into_response()
        }
    }
}

/// Webhook routes mounted at the root level (not under /api/v1), matching
/// the URL the chain watcher delivers to.
pub fn routes() -> Router<AppState> {
    Router::new().route("/webhook", post(receive_webhook))
}

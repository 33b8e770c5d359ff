//! Notification test handler.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{DeliveryReportDto, NotifyTestRequest, NotifyTestResponse};
use crate::app_state::AppState;

const DEFAULT_TEST_MESSAGE: &str = "qx-gateway notification test";

/// `POST /notifications/test` — Fire a test message on every channel.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/test",
    tag = "Notifications",
    summary = "Send a test notification",
    description = "Attempts delivery of a test message on every channel and reports per-channel outcomes. Unconfigured channels report as not delivered.",
    request_body = NotifyTestRequest,
    responses(
        (status = 200, description = "Per-channel delivery reports", body = NotifyTestResponse),
    )
)]
pub async fn test_notification(
    State(state): State<AppState>,
    Json(req): Json<NotifyTestRequest>,
) -> impl IntoResponse {
    let message = req.message.as_deref().unwrap_or(DEFAULT_TEST_MESSAGE);
    let reports = state.event_service.notifier().dispatch(message).await;
    Json(NotifyTestResponse {
        results: reports.into_iter().map(DeliveryReportDto::from).collect(),
    })
}

/// Notification routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/notifications/test", post(test_notification))
}

//! Whale threshold configuration handlers.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{ThresholdsResponse, UpdateThresholdsRequest};
use crate::app_state::AppState;
use crate::domain::WhaleThresholds;

/// `GET /thresholds` — Current whale thresholds.
#[utoipa::path(
    get,
    path = "/api/v1/thresholds",
    tag = "Thresholds",
    summary = "Get whale thresholds",
    description = "Returns the per-token whale thresholds and the default applied to unlisted tokens.",
    responses(
        (status = 200, description = "Threshold table", body = ThresholdsResponse),
    )
)]
pub async fn get_thresholds(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.event_service.thresholds().snapshot();
    Json(ThresholdsResponse::from_snapshot(&snapshot))
}

/// `PUT /thresholds` — Update whale thresholds.
#[utoipa::path(
    put,
    path = "/api/v1/thresholds",
    tag = "Thresholds",
    summary = "Update whale thresholds",
    description = "Merges the given entries over the current table, or replaces the whole table when `replace` is true. Token symbols are stored uppercase.",
    request_body = UpdateThresholdsRequest,
    responses(
        (status = 200, description = "Updated threshold table", body = ThresholdsResponse),
    )
)]
pub async fn update_thresholds(
    State(state): State<AppState>,
    Json(req): Json<UpdateThresholdsRequest>,
) -> impl IntoResponse {
    let store = state.event_service.thresholds();

    if req.replace {
        let mut table = WhaleThresholds::empty();
        for entry in &req.thresholds {
            table.set(&entry.token, entry.amount);
        }
        store.replace(table);
    } else {
        for entry in &req.thresholds {
            store.set(&entry.token, entry.amount);
        }
    }

    let snapshot = store.snapshot();
    tracing::info!(entries = req.thresholds.len(), replace = req.replace, "thresholds updated");
    Json(ThresholdsResponse::from_snapshot(&snapshot))
}

/// Threshold routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/thresholds", get(get_thresholds).put(update_thresholds))
}

//! Event read handlers: recent list, per-wallet history, live feed.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{EventListResponse, ListParams};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, QxError};

/// `GET /events` — Most recent events, newest first.
///
/// # Errors
///
/// Returns [`QxError::Persistence`] on database failure.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "Events",
    summary = "List recent events",
    description = "Returns the most recently stored events, newest first.",
    params(ListParams),
    responses(
        (status = 200, description = "Event list", body = EventListResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, QxError> {
    let limit = params.effective_limit(state.config.default_list_limit);
    let records = state.event_service.recent(limit).await?;
    Ok(Json(EventListResponse::from_records(records)))
}

/// `GET /events/wallet/:address` — Events involving a wallet.
///
/// # Errors
///
/// Returns [`QxError::Persistence`] on database failure.
#[utoipa::path(
    get,
    path = "/api/v1/events/wallet/{address}",
    tag = "Events",
    summary = "List events for a wallet",
    description = "Returns events where the wallet appears as source or destination, newest first.",
    params(
        ("address" = String, Path, description = "Wallet address"),
        ListParams,
    ),
    responses(
        (status = 200, description = "Event list", body = EventListResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn list_wallet_events(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, QxError> {
    let limit = params.effective_limit(state.config.default_list_limit);
    let records = state.event_service.by_wallet(&address, limit).await?;
    Ok(Json(EventListResponse::from_records(records)))
}

/// `GET /feed` — Current live feed snapshot.
#[utoipa::path(
    get,
    path = "/api/v1/feed",
    tag = "Events",
    summary = "Live feed snapshot",
    description = "Returns the in-memory live feed: the newest events, deduplicated by transaction id, served without a database round trip.",
    responses(
        (status = 200, description = "Feed snapshot", body = EventListResponse),
    )
)]
pub async fn live_feed(State(state): State<AppState>) -> impl IntoResponse {
    Json(EventListResponse::from_records(state.feed.snapshot()))
}

/// Event read routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events))
        .route("/events/wallet/{address}", get(list_wallet_events))
        .route("/feed", get(live_feed))
}

//! Aggregate statistics handlers over the rolling 24-hour window.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{
    ActivityBucketDto, ActivityResponse, StatsResponse, TopWalletsResponse, WalletVolumeDto,
};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, QxError};

/// `GET /stats` — Headline KPIs.
///
/// # Errors
///
/// Returns [`QxError::Persistence`] on database failure.
#[utoipa::path(
    get,
    path = "/api/v1/stats",
    tag = "Stats",
    summary = "Headline KPIs",
    description = "Returns event count, distinct active wallets, whale event count and summed volume over the last 24 hours.",
    responses(
        (status = 200, description = "KPI aggregates", body = StatsResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn kpi_stats(State(state): State<AppState>) -> Result<impl IntoResponse, QxError> {
    let stats = state.event_service.kpi_stats().await?;
    Ok(Json(StatsResponse::from(stats)))
}

/// `GET /stats/activity` — 2-hour activity buckets.
///
/// # Errors
///
/// Returns [`QxError::Persistence`] on database failure.
#[utoipa::path(
    get,
    path = "/api/v1/stats/activity",
    tag = "Stats",
    summary = "Activity buckets",
    description = "Partitions the last 24 hours into twelve 2-hour buckets with per-category event counts and volume. Empty buckets are included with zero counts.",
    responses(
        (status = 200, description = "Bucket series, oldest first", body = ActivityResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn activity(State(state): State<AppState>) -> Result<impl IntoResponse, QxError> {
    let buckets = state.event_service.activity().await?;
    Ok(Json(ActivityResponse {
        buckets: buckets.into_iter().map(ActivityBucketDto::from).collect(),
    }))
}

/// `GET /stats/top-wallets` — Volume leaderboard.
///
/// # Errors
///
/// Returns [`QxError::Persistence`] on database failure.
#[utoipa::path(
    get,
    path = "/api/v1/stats/top-wallets",
    tag = "Stats",
    summary = "Top wallets by volume",
    description = "Returns the five wallets with the highest summed event volume over the last 24 hours, highest first. Ties keep first-seen order.",
    responses(
        (status = 200, description = "Leaderboard", body = TopWalletsResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn top_wallets(State(state): State<AppState>) -> Result<impl IntoResponse, QxError> {
    let wallets = state.event_service.top_wallets().await?;
    Ok(Json(TopWalletsResponse {
        wallets: wallets.into_iter().map(WalletVolumeDto::from).collect(),
    }))
}

/// Statistics routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(kpi_stats))
        .route("/stats/activity", get(activity))
        .route("/stats/top-wallets", get(top_wallets))
}

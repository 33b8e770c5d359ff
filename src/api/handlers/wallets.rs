//! Wallet directory handler.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{ListParams, WalletListResponse};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, QxError};

/// `GET /wallets` — Known wallets by recency.
///
/// # Errors
///
/// Returns [`QxError::Persistence`] on database failure.
#[utoipa::path(
    get,
    path = "/api/v1/wallets",
    tag = "Wallets",
    summary = "List known wallets",
    description = "Returns wallets observed as event sources, most recently seen first, with first-seen timestamps and event counts.",
    params(ListParams),
    responses(
        (status = 200, description = "Wallet list", body = WalletListResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn list_wallets(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, QxError> {
    let limit = params.effective_limit(state.config.default_list_limit);
    let records = state.event_service.wallets(limit).await?;
    Ok(Json(WalletListResponse::from_records(records)))
}

/// Wallet directory routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/wallets", get(list_wallets))
}

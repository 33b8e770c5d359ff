//! REST endpoint handlers organized by resource.

pub mod events;
pub mod notifications;
pub mod stats;
pub mod system;
pub mod thresholds;
pub mod wallets;
pub mod webhook;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(events::routes())
        .merge(stats::routes())
        .merge(wallets::routes())
        .merge(thresholds::routes())
        .merge(notifications::routes())
}

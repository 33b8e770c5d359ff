//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Read endpoints are mounted under `/api/v1`; the ingestion webhook and
//! the health check stay at the root, matching the URLs their callers
//! were built against.

pub mod dto;
pub mod handlers;

use axum::Router;

use crate::app_state::AppState;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::webhook::routes())
        .merge(handlers::system::routes())
}

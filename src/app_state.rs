//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::QxConfig;
use crate::domain::EventBus;
use crate::service::{EventService, FeedCache};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Event service for ingestion and read queries.
    pub event_service: Arc<EventService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
    /// In-memory live feed cache.
    pub feed: FeedCache,
    /// Startup configuration.
    pub config: Arc<QxConfig>,
}

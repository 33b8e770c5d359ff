//! qx-gateway server entry point.
//!
//! Starts the Axum HTTP server with the ingestion webhook, REST read
//! endpoints and the WebSocket event stream.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use qx_gateway::api;
use qx_gateway::app_state::AppState;
use qx_gateway::config::QxConfig;
use qx_gateway::domain::{EventBus, ThresholdStore, WhaleThresholds};
use qx_gateway::notify::NotificationHub;
use qx_gateway::persistence::EventStore;
use qx_gateway::service::{EventService, FeedCache, run_feed_task};
use qx_gateway::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = QxConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting qx-gateway");

    // Connect to PostgreSQL and apply migrations
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("database ready");

    // Build domain layer
    let store = EventStore::new(pool);
    let event_bus = EventBus::new(config.event_bus_capacity);
    let thresholds = Arc::new(ThresholdStore::new(WhaleThresholds::default()));
    let notifier = Arc::new(NotificationHub::new(config.notify.clone())?);

    // Build service layer
    let event_service = Arc::new(EventService::new(
        store.clone(),
        event_bus.clone(),
        Arc::clone(&thresholds),
        Arc::clone(&notifier),
        config.duplicate_policy,
        config.whale_alerts_enabled,
    ));

    // Live feed cache kept warm by a background task
    let feed = FeedCache::new(config.feed_capacity);
    tokio::spawn(run_feed_task(
        feed.clone(),
        store,
        event_bus.clone(),
        Duration::from_secs(config.feed_refresh_secs),
    ));

    // Build application state
    let app_state = AppState {
        event_service,
        event_bus,
        feed,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;

use crate::notify::NotifyConfig;
use crate::persistence::DuplicatePolicy;

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`QxConfig::from_env`].
#[derive(Debug, Clone)]
pub struct QxConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// PostgreSQL connection string.
    pub database_url: String,

    /// Maximum number of database connections in the pool.
    pub database_max_connections: u32,

    /// Minimum idle connections in the pool.
    pub database_min_connections: u32,

    /// Timeout in seconds for acquiring a database connection.
    pub database_connect_timeout_secs: u64,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,

    /// Maximum number of entries held in the live feed.
    pub feed_capacity: usize,

    /// Seconds between full feed refreshes from the store.
    pub feed_refresh_secs: u64,

    /// Default `limit` for list endpoints when the caller omits it.
    pub default_list_limit: i64,

    /// How a webhook delivery whose `tx_id` is already stored is handled.
    pub duplicate_policy: DuplicatePolicy,

    /// Whether whale events trigger outbound notifications.
    pub whale_alerts_enabled: bool,

    /// Outbound notification channel credentials.
    pub notify: NotifyConfig,
}

impl QxConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://qx:qx@localhost:5432/qx_gateway".to_string());

        let database_max_connections = parse_env("DATABASE_MAX_CONNECTIONS", 10);
        let database_min_connections = parse_env("DATABASE_MIN_CONNECTIONS", 2);
        let database_connect_timeout_secs = parse_env("DATABASE_CONNECT_TIMEOUT_SECS", 5);

        let event_bus_capacity = parse_env("EVENT_BUS_CAPACITY", 10_000);
        let feed_capacity = parse_env("FEED_CAPACITY", 100);
        let feed_refresh_secs = parse_env("FEED_REFRESH_SECS", 30);
        let default_list_limit = parse_env("DEFAULT_LIST_LIMIT", 100);

        let duplicate_policy = parse_env("DUPLICATE_POLICY", DuplicatePolicy::Merge);
        let whale_alerts_enabled = parse_env_bool("WHALE_ALERTS_ENABLED", false);

        let notify = NotifyConfig {
            telegram_bot_token: non_empty_env("TELEGRAM_BOT_TOKEN"),
            telegram_chat_id: non_empty_env("TELEGRAM_CHAT_ID"),
            discord_webhook_url: non_empty_env("DISCORD_WEBHOOK_URL"),
            relay_webhook_url: non_empty_env("RELAY_WEBHOOK_URL"),
            sender_name: std::env::var("NOTIFY_SENDER_NAME")
                .unwrap_or_else(|_| "qx-gateway".to_string()),
        };

        Ok(Self {
            listen_addr,
            database_url,
            database_max_connections,
            database_min_connections,
            database_connect_timeout_secs,
            event_bus_capacity,
            feed_capacity,
            feed_refresh_secs,
            default_list_limit,
            duplicate_policy,
            whale_alerts_enabled,
            notify,
        })
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().as_deref() {
        Some("true") | Some("TRUE") | Some("1") => true,
        Some("false") | Some("FALSE") | Some("0") => false,
        _ => default,
    }
}

/// Reads an environment variable, treating the empty string as unset.
fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

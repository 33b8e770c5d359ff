//! Persistence layer: PostgreSQL event store and wallet recency tracking.
//!
//! The store owns the two tables the pipeline touches: `qx_events` (one
//! row per canonical event, unique on `tx_id`) and `wallets` (one row per
//! address). The concrete implementation uses `sqlx::PgPool` for async
//! PostgreSQL access; schema lives in the `migrations/` directory.

pub mod models;
pub mod postgres;

pub use models::WalletRecord;
pub use postgres::{DuplicatePolicy, EventStore, InsertOutcome};

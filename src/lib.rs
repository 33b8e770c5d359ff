//! # qx-gateway
//!
//! Ingestion webhook, event store and realtime feed gateway for the QX
//! token exchange on the Qubic network.
//!
//! The gateway accepts exchange events from an upstream chain watcher via a
//! JSON webhook, normalizes the two historical payload shapes into one
//! canonical record, persists them idempotently to PostgreSQL, and serves
//! them back to dashboard clients over REST and WebSocket together with
//! whale classification and derived activity statistics.
//!
//! ## Architecture
//!
//! ```text
//! Chain watcher (HTTP POST)      Dashboard clients (HTTP, WebSocket)
//!     │                              │
//!     ├── Webhook Handler (api/)     ├── REST Handlers (api/)
//!     │                              ├── WS Handler (ws/)
//!     │                              │
//!     ├── EventService (service/)    ├── FeedCache (service/)
//!     ├── Normalizer (domain/)       ├── Aggregates (domain/)
//!     ├── EventBus (domain/)         ├── WhaleThresholds (domain/)
//!     │                              │
//!     └── PostgreSQL Persistence ────┘
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod notify;
pub mod persistence;
pub mod service;
pub mod ws;

//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` streams stored events to clients in
//! real time. Connections start with every token subscribed and can
//! narrow the stream to specific token symbols.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;

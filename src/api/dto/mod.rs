//! Data Transfer Objects for REST request/response serialization.
//!
//! Event amounts stay string-encoded end to end to avoid precision loss
//! on large on-chain magnitudes.

pub mod event_dto;
pub mod notify_dto;
pub mod stats_dto;
pub mod threshold_dto;
pub mod wallet_dto;
pub mod webhook_dto;

pub use event_dto::*;
pub use notify_dto::*;
pub use stats_dto::*;
pub use threshold_dto::*;
pub use wallet_dto::*;
pub use webhook_dto::*;

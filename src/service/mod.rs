//! Service layer: orchestration between the HTTP surface, the domain
//! rules, and the persistence layer.

pub mod event_service;
pub mod feed;

pub use event_service::{EventService, IngestReport};
pub use feed::{FeedCache, run_feed_task};

//! Domain layer: canonical event types, payload normalization, whale
//! classification, the realtime event bus, and pure aggregate folds.
//!
//! Everything in this module is free of I/O. The service layer wires these
//! pieces to the persistence and transport layers.

pub mod aggregates;
pub mod amount;
pub mod event;
pub mod event_bus;
pub mod feed;
pub mod normalizer;
pub mod whale;

pub use amount::parse_amount;
pub use event::{ActionCategory, EventDraft, EventRecord};
pub use event_bus::EventBus;
pub use feed::BoundedFeed;
pub use whale::{DEFAULT_WHALE_THRESHOLD, ThresholdStore, WhaleThresholds};

//! Application events (pub/sub)
//!
//! Change notifications for presence and reservations. Subscribers get
//! wake-ups and re-read the store; payloads only carry enough to filter.

pub mod event_bus;
pub mod types;

pub use event_bus::{create_event_bus, EventBus, EventSubscriber, SharedEventBus};
pub use types::*;

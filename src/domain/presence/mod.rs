//! Slot presence aggregate
//!
//! A presence row says "this user has the booking form for this slot open".
//! Rows are advisory and expire on their own; readers must always filter by
//! `expires_at > now`.

pub mod model;
pub mod repository;

pub use model::{SlotKey, SlotPresence};
pub use repository::PresenceRepository;

//! WebSocket interfaces
//!
//! - `presence`: live viewer lists for a slot, optionally holding a viewing
//!   session for the connected user

pub mod presence;

pub use presence::{presence_ws_handler, PresenceWsQuery};

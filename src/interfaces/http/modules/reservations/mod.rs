//! Booking a table slot and reading back reservations

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;

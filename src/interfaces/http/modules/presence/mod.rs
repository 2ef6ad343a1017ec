//! "Someone is booking this slot" signals over REST

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;

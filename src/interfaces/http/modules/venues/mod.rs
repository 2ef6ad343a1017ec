//! Venues, their tables and the per-date slot board

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;

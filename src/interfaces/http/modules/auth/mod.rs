//! Registration, login and the current-user profile

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;

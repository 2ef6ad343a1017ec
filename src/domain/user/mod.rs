//! User aggregate
//!
//! The authenticated principal that owns reservations and presence rows.

pub mod model;
pub mod repository;

pub use model::{User, UserRole};
pub use repository::UserRepository;

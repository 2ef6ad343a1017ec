//! Dining table aggregate

pub mod model;
pub mod repository;

pub use model::{CapacityFilter, DiningTable};
pub use repository::TableRepository;

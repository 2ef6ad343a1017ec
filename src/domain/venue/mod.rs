//! Venue aggregate
//!
//! A venue owns its operating window and slot duration; both are fixed for
//! the length of a browsing session.

pub mod model;
pub mod repository;

pub use model::Venue;
pub use repository::VenueRepository;

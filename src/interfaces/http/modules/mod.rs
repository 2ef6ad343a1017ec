pub mod auth;
pub mod health;
pub mod members;
pub mod metrics;
pub mod presence;
pub mod reservations;
pub mod venues;

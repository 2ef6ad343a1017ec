//! # tablerez
//!
//! Table reservation service: venues publish bookable time slots, guests
//! reserve a table for one slot, and everyone browsing sees which slots
//! are taken or being booked right now.
//!
//! ## Architecture
//!
//! - **domain**: entities, slot generation and repository traits
//! - **application**: presence tracking, the reservation writer, the slot
//!   board, notifications and the event bus
//! - **infrastructure**: SeaORM/SQLite storage, in-memory storage, crypto
//! - **interfaces**: REST API with Swagger docs and the presence WebSocket
//! - **server**: wiring and lifecycle

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

pub use interfaces::http::create_api_router;

pub use application::{create_event_bus, Event, EventBus, SharedEventBus};

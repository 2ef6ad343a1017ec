//! HTTP REST API
//!
//! - `middleware`: bearer-token authentication
//! - `modules`: handlers and DTOs per resource
//! - `router`: route table, OpenAPI document and Swagger UI

pub mod common;
pub mod error;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;

pub use router::{create_api_router, ApiDoc, RouterDeps};
pub use state::ApiState;

//! Liveness with a database round-trip

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::SharedEventBus;

#[derive(Clone)]
pub struct HealthState {
    pub db: DatabaseConnection,
    pub event_bus: SharedEventBus,
    pub started_at: Arc<Instant>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// `ok` or `degraded`
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub database: ComponentHealth,
    /// Open presence watches and other event subscribers
    pub live_subscribers: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealth {
    pub status: String,
    pub latency_ms: Option<u64>,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let ping_started = Instant::now();
    let ping = state
        .db
        .execute(Statement::from_string(
            state.db.get_database_backend(),
            "SELECT 1".to_string(),
        ))
        .await;

    let (status, database) = match ping {
        Ok(_) => (
            StatusCode::OK,
            ComponentHealth {
                status: "ok".to_string(),
                latency_ms: Some(ping_started.elapsed().as_millis() as u64),
            },
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Health check database ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                ComponentHealth {
                    status: "error".to_string(),
                    latency_ms: None,
                },
            )
        }
    };

    let overall = if status == StatusCode::OK { "ok" } else { "degraded" };
    (
        status,
        Json(HealthResponse {
            status: overall.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: state.started_at.elapsed().as_secs(),
            database,
            live_subscribers: state.event_bus.subscriber_count(),
        }),
    )
}

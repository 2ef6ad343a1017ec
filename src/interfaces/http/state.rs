//! Shared handler state

use std::sync::Arc;

use axum::extract::FromRef;

use super::middleware::AuthState;
use crate::application::{AvailabilityService, PresenceTracker, ReservationService};
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::JwtConfig;

/// Everything the booking endpoints need, built once by the server and
/// cloned into each request.
#[derive(Clone)]
pub struct ApiState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub availability: AvailabilityService,
    pub reservations: ReservationService,
    pub presence: PresenceTracker,
    pub jwt_config: JwtConfig,
    pub bcrypt_cost: u32,
}

impl FromRef<ApiState> for AuthState {
    fn from_ref(state: &ApiState) -> Self {
        AuthState {
            jwt_config: state.jwt_config.clone(),
        }
    }
}

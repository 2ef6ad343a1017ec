//! Bearer-token authentication for Axum

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::error::ApiError;
use crate::domain::UserRole;
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig, TokenClaims};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
}

impl AuthError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingToken => "Missing authentication token",
            Self::InvalidToken => "Invalid authentication token",
            Self::ExpiredToken => "Token has expired",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::unauthorized(self.message()).into_response()
    }
}

#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// Inserted into request extensions by [`auth_middleware`].
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub username: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            role: UserRole::from_str(&claims.role),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::forbidden("Admin role required"))
        }
    }
}

fn extract_bearer(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Verify a raw token. Shared with the WebSocket handshake, which carries
/// the token in the query string.
pub fn authenticate_token(token: &str, config: &JwtConfig) -> Result<AuthenticatedUser, AuthError> {
    let claims = verify_token(token, config).map_err(|_| AuthError::InvalidToken)?;
    if claims.is_expired() {
        return Err(AuthError::ExpiredToken);
    }
    Ok(AuthenticatedUser::from_claims(claims))
}

pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(auth_header) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        return AuthError::MissingToken.into_response();
    };

    let Some(token) = extract_bearer(auth_header) else {
        return AuthError::InvalidToken.into_response();
    };

    match authenticate_token(token, &auth_state.jwt_config) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::crypto::jwt::create_token;

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(extract_bearer("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer("Basic abc"), None);
        assert_eq!(extract_bearer("Bearer "), None);
    }

    #[test]
    fn valid_token_yields_user_with_role() {
        let cfg = JwtConfig::default();
        let token = create_token("u1", "alice", "admin", &cfg).unwrap();
        let user = authenticate_token(&token, &cfg).unwrap();
        assert_eq!(user.user_id, "u1");
        assert!(user.is_admin());
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let token = create_token("u1", "alice", "guest", &JwtConfig::default()).unwrap();
        let other = JwtConfig {
            secret: "different".into(),
            ..JwtConfig::default()
        };
        assert_eq!(
            authenticate_token(&token, &other).unwrap_err(),
            AuthError::InvalidToken
        );
    }
}

//! Authentication API handlers

use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::Utc;
use tracing::{error, info};

use super::dto::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};
use crate::domain::{User, UserRole};
use crate::infrastructure::crypto::jwt::create_token;
use crate::infrastructure::crypto::password::{hash_password, verify_password};
use crate::interfaces::http::common::{ApiResponse, ValidatedJson};
use crate::interfaces::http::error::{ApiError, ApiResult};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::state::ApiState;

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<ApiState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let user = state
        .repos
        .users()
        .find_by_login(request.username.trim())
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if !user.is_active {
        return Err(ApiError::unauthorized("Account is disabled"));
    }

    if !verify_password(&request.password, &user.password_hash).unwrap_or(false) {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    if let Err(e) = state.repos.users().record_login(&user.id, Utc::now()).await {
        error!(user_id = %user.id, error = %e, "Failed to record login time");
    }

    let token = create_token(
        &user.id,
        &user.username,
        user.role.as_str(),
        &state.jwt_config,
    )
    .map_err(|e| {
        error!(error = %e, "Token signing failed");
        ApiError::internal()
    })?;

    Ok(Json(ApiResponse::success(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_config.expiration_hours * 3600,
        user: UserInfo::from(&user),
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserInfo>),
        (status = 409, description = "Username or email already taken"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register(
    State(state): State<ApiState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserInfo>>), ApiError> {
    let password_hash = hash_password(&request.password, state.bcrypt_cost).map_err(|e| {
        error!(error = %e, "Password hashing failed");
        ApiError::internal()
    })?;

    let user = User::new(
        request.username.trim(),
        request.email.trim().to_lowercase(),
        password_hash,
        UserRole::Guest,
    );
    state.repos.users().create(user.clone()).await?;
    info!(username = %user.username, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserInfo::from(&user))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserInfo>),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_current_user(
    State(state): State<ApiState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> ApiResult<UserInfo> {
    let user = state
        .repos
        .users()
        .find_by_id(&auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(ApiResponse::success(UserInfo::from(&user))))
}

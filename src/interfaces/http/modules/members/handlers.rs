//! Member API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{CreateMemberRequest, MemberDto};
use crate::domain::Member;
use crate::interfaces::http::common::{ApiResponse, ValidatedJson};
use crate::interfaces::http::error::{ApiError, ApiResult};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::state::ApiState;

#[utoipa::path(
    get,
    path = "/api/v1/members/{member_number}",
    tag = "Members",
    params(("member_number" = String, Path, description = "Membership number")),
    responses(
        (status = 200, description = "Member contact details", body = ApiResponse<MemberDto>),
        (status = 404, description = "No member with that number")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_member(
    State(state): State<ApiState>,
    Path(member_number): Path<String>,
) -> ApiResult<MemberDto> {
    let member = state
        .repos
        .members()
        .find_by_member_number(member_number.trim())
        .await?
        .ok_or_else(|| ApiError::not_found("Member not found"))?;
    Ok(Json(ApiResponse::success(MemberDto::from(member))))
}

#[utoipa::path(
    post,
    path = "/api/v1/members",
    tag = "Members",
    request_body = CreateMemberRequest,
    responses(
        (status = 201, description = "Member saved", body = ApiResponse<MemberDto>),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_member(
    State(state): State<ApiState>,
    Extension(auth): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateMemberRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MemberDto>>), ApiError> {
    auth.require_admin()?;

    let member = Member {
        member_number: request.member_number.trim().to_string(),
        name: request.name.trim().to_string(),
        email: request.email.trim().to_string(),
        phone: request.phone.trim().to_string(),
    };
    state.repos.members().save(member.clone()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(MemberDto::from(member))),
    ))
}

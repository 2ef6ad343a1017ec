//! Presence API handlers
//!
//! Store trouble never fails these requests: begin answers with a null
//! handle, list answers with nobody.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};

use super::dto::*;
use crate::application::EndViewing;
use crate::interfaces::http::common::{ApiResponse, EmptyData, ValidatedJson};
use crate::interfaces::http::error::{ApiError, ApiResult};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::state::ApiState;

#[utoipa::path(
    post,
    path = "/api/v1/presence",
    tag = "Presence",
    request_body = PresenceRequest,
    responses((status = 200, description = "Viewing recorded or refreshed", body = ApiResponse<PresenceHandleDto>)),
    security(("bearer_auth" = []))
)]
pub async fn begin_viewing(
    State(state): State<ApiState>,
    Extension(auth): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<PresenceRequest>,
) -> ApiResult<PresenceHandleDto> {
    let slot = slot_key(&request.venue_id, &request.table_id, request.date, &request.time)?;
    let presence_id = state
        .presence
        .begin_viewing(&auth.user_id, &slot, request.presence_id.as_deref())
        .await;

    let settings = state.presence.settings();
    Ok(Json(ApiResponse::success(PresenceHandleDto {
        presence_id,
        ttl_secs: settings.ttl.as_secs(),
        refresh_interval_secs: settings.refresh_interval.as_secs(),
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/presence",
    tag = "Presence",
    params(SlotQuery),
    responses((status = 200, description = "Other users currently booking the slot", body = ApiResponse<ViewerListDto>)),
    security(("bearer_auth" = []))
)]
pub async fn list_viewers(
    State(state): State<ApiState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(query): Query<SlotQuery>,
) -> ApiResult<ViewerListDto> {
    let slot = query.slot_key()?;
    let viewers = state
        .presence
        .list_viewers(&slot, Some(&auth.user_id))
        .await;
    Ok(Json(ApiResponse::success(ViewerListDto::new(&slot, &viewers))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/presence/{presence_id}",
    tag = "Presence",
    params(("presence_id" = String, Path, description = "Presence handle")),
    responses(
        (status = 200, description = "Viewing ended", body = ApiResponse<EmptyData>),
        (status = 403, description = "Row belongs to another user")
    ),
    security(("bearer_auth" = []))
)]
pub async fn end_viewing(
    State(state): State<ApiState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(presence_id): Path<String>,
) -> ApiResult<EmptyData> {
    let caller = (!auth.is_admin()).then_some(auth.user_id.as_str());

    match state.presence.end_viewing(&presence_id, caller).await {
        EndViewing::NotOwner => Err(ApiError::forbidden("Presence belongs to another user")),
        EndViewing::Removed | EndViewing::Missing => Ok(Json(ApiResponse::success(EmptyData {}))),
    }
}

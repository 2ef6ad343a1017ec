//! Reservation API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{CreateReservationRequest, ReservationDto};
use crate::application::NewReservation;
use crate::domain::slot::parse_slot;
use crate::domain::CustomerDetails;
use crate::interfaces::http::common::{ApiResponse, ValidatedJson};
use crate::interfaces::http::error::{ApiError, ApiResult};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::state::ApiState;

#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation confirmed", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Missing customer details, bad guest count or unknown slot"),
        (status = 404, description = "Venue or table not found"),
        (status = 409, description = "This time slot has just been booked"),
        (status = 500, description = "Store failure")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_reservation(
    State(state): State<ApiState>,
    Extension(auth): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReservationDto>>), ApiError> {
    let start_time = parse_slot(&request.start_time)
        .ok_or_else(|| ApiError::bad_request("start_time must be HH:MM"))?;

    let reservation = state
        .reservations
        .create_reservation(
            &auth.user_id,
            NewReservation {
                venue_id: request.venue_id,
                table_id: request.table_id,
                date: request.date,
                start_time,
                guest_count: request.guest_count,
                customer: CustomerDetails {
                    name: request.customer_name,
                    email: request.customer_email,
                    phone: request.customer_phone,
                    member_number: request.member_number,
                    notes: request.notes,
                },
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ReservationDto::from(&reservation))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/mine",
    tag = "Reservations",
    responses((status = 200, description = "The caller's reservations", body = ApiResponse<Vec<ReservationDto>>)),
    security(("bearer_auth" = []))
)]
pub async fn list_my_reservations(
    State(state): State<ApiState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> ApiResult<Vec<ReservationDto>> {
    let reservations = state.reservations.list_for_user(&auth.user_id).await?;
    Ok(Json(ApiResponse::success(
        reservations.iter().map(ReservationDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{reservation_id}",
    tag = "Reservations",
    params(("reservation_id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation", body = ApiResponse<ReservationDto>),
        (status = 403, description = "Owned by another user"),
        (status = 404, description = "Reservation not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_reservation(
    State(state): State<ApiState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(reservation_id): Path<String>,
) -> ApiResult<ReservationDto> {
    let reservation = state.reservations.get(&reservation_id).await?;
    if reservation.user_id != auth.user_id && !auth.is_admin() {
        return Err(ApiError::forbidden("Reservation belongs to another user"));
    }
    Ok(Json(ApiResponse::success(ReservationDto::from(&reservation))))
}

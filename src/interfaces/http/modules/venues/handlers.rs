//! Venue API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::info;

use super::dto::*;
use crate::domain::slot::parse_slot;
use crate::domain::{CapacityFilter, DiningTable, DomainError, Venue};
use crate::interfaces::http::common::{ApiResponse, ValidatedJson};
use crate::interfaces::http::error::{ApiError, ApiResult};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::state::ApiState;

fn capacity_filter(raw: Option<&str>) -> Result<CapacityFilter, ApiError> {
    Ok(raw.unwrap_or("all").parse::<CapacityFilter>()?)
}

fn time_field(field: &str, raw: &str) -> Result<chrono::NaiveTime, ApiError> {
    parse_slot(raw).ok_or_else(|| ApiError::bad_request(format!("{field} must be HH:MM")))
}

async fn load_venue(state: &ApiState, venue_id: &str) -> Result<Venue, ApiError> {
    state
        .repos
        .venues()
        .find_by_id(venue_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Venue", "id", venue_id).into())
}

#[utoipa::path(
    get,
    path = "/api/v1/venues",
    tag = "Venues",
    responses((status = 200, description = "All venues", body = ApiResponse<Vec<VenueDto>>)),
    security(("bearer_auth" = []))
)]
pub async fn list_venues(State(state): State<ApiState>) -> ApiResult<Vec<VenueDto>> {
    let venues = state.repos.venues().find_all().await?;
    Ok(Json(ApiResponse::success(
        venues.iter().map(VenueDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/venues/{venue_id}",
    tag = "Venues",
    params(("venue_id" = String, Path, description = "Venue ID")),
    responses(
        (status = 200, description = "Venue", body = ApiResponse<VenueDto>),
        (status = 404, description = "Venue not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_venue(
    State(state): State<ApiState>,
    Path(venue_id): Path<String>,
) -> ApiResult<VenueDto> {
    let venue = load_venue(&state, &venue_id).await?;
    Ok(Json(ApiResponse::success(VenueDto::from(&venue))))
}

#[utoipa::path(
    post,
    path = "/api/v1/venues",
    tag = "Venues",
    request_body = CreateVenueRequest,
    responses(
        (status = 201, description = "Venue created", body = ApiResponse<VenueDto>),
        (status = 400, description = "Invalid operating hours"),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_venue(
    State(state): State<ApiState>,
    Extension(auth): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateVenueRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VenueDto>>), ApiError> {
    auth.require_admin()?;

    let opening = time_field("opening_time", &request.opening_time)?;
    let closing = time_field("closing_time", &request.closing_time)?;
    let mut venue = Venue::new(
        request.name.trim(),
        request.address.trim(),
        opening,
        closing,
        request.slot_duration_minutes,
    )?;
    if let Some(description) = request.description.filter(|d| !d.trim().is_empty()) {
        venue = venue.with_description(description.trim());
    }

    state.repos.venues().save(venue.clone()).await?;
    info!(venue_id = %venue.id, name = %venue.name, "Venue created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(VenueDto::from(&venue))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/venues/{venue_id}/tables",
    tag = "Venues",
    params(("venue_id" = String, Path, description = "Venue ID"), CapacityQuery),
    responses(
        (status = 200, description = "Active tables ordered by number", body = ApiResponse<Vec<TableDto>>),
        (status = 400, description = "Unknown capacity filter")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_tables(
    State(state): State<ApiState>,
    Path(venue_id): Path<String>,
    Query(query): Query<CapacityQuery>,
) -> ApiResult<Vec<TableDto>> {
    let filter = capacity_filter(query.capacity.as_deref())?;
    let tables = state.availability.tables(&venue_id, filter).await?;
    Ok(Json(ApiResponse::success(
        tables.iter().map(TableDto::from).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/venues/{venue_id}/tables",
    tag = "Venues",
    params(("venue_id" = String, Path, description = "Venue ID")),
    request_body = CreateTableRequest,
    responses(
        (status = 201, description = "Table created", body = ApiResponse<TableDto>),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Venue not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_table(
    State(state): State<ApiState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(venue_id): Path<String>,
    ValidatedJson(request): ValidatedJson<CreateTableRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TableDto>>), ApiError> {
    auth.require_admin()?;
    let venue = load_venue(&state, &venue_id).await?;

    let table = DiningTable::new(&venue.id, request.table_number.trim(), request.capacity)?;
    state.repos.tables().save(table.clone()).await?;
    info!(venue_id = %venue.id, table = %table.table_number, "Table created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(TableDto::from(&table))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/venues/{venue_id}/board",
    tag = "Venues",
    params(("venue_id" = String, Path, description = "Venue ID"), BoardQuery),
    responses(
        (status = 200, description = "Slot board for the date", body = ApiResponse<BoardDto>),
        (status = 404, description = "Venue not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_board(
    State(state): State<ApiState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(venue_id): Path<String>,
    Query(query): Query<BoardQuery>,
) -> ApiResult<BoardDto> {
    let filter = capacity_filter(query.capacity.as_deref())?;
    let board = state
        .availability
        .board(&venue_id, query.date, filter, Some(&auth.user_id))
        .await?;
    Ok(Json(ApiResponse::success(BoardDto::from(board))))
}

#[utoipa::path(
    get,
    path = "/api/v1/venues/{venue_id}/reservations",
    tag = "Venues",
    params(("venue_id" = String, Path, description = "Venue ID"), DateQuery),
    responses((status = 200, description = "Active bookings for the date", body = ApiResponse<Vec<VenueBookingDto>>)),
    security(("bearer_auth" = []))
)]
pub async fn list_venue_reservations(
    State(state): State<ApiState>,
    Path(venue_id): Path<String>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Vec<VenueBookingDto>> {
    let reservations = state
        .reservations
        .list_active_for_venue_on(&venue_id, query.date)
        .await?;
    Ok(Json(ApiResponse::success(
        reservations.iter().map(VenueBookingDto::from).collect(),
    )))
}

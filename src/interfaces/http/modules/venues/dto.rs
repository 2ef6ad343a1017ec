//! Venue DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::booking::{Board, SlotState};
use crate::domain::slot::format_slot;
use crate::domain::{DiningTable, Reservation, Venue};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VenueDto {
    pub id: String,
    pub name: String,
    pub address: String,
    pub description: Option<String>,
    /// `HH:MM`
    pub opening_time: String,
    /// `HH:MM`
    pub closing_time: String,
    pub slot_duration_minutes: u32,
    /// Bookable start times, `HH:MM`
    pub slots: Vec<String>,
}

impl From<&Venue> for VenueDto {
    fn from(v: &Venue) -> Self {
        Self {
            id: v.id.clone(),
            name: v.name.clone(),
            address: v.address.clone(),
            description: v.description.clone(),
            opening_time: format_slot(v.opening_time),
            closing_time: format_slot(v.closing_time),
            slot_duration_minutes: v.slot_duration_minutes,
            slots: v.slots().into_iter().map(format_slot).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateVenueRequest {
    #[validate(length(min = 1, max = 200, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 500, message = "address is required"))]
    pub address: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    /// `HH:MM` or `HH:MM:SS`
    pub opening_time: String,
    /// `HH:MM` or `HH:MM:SS`
    pub closing_time: String,
    #[validate(range(min = 5, max = 720, message = "slot duration must be 5-720 minutes"))]
    pub slot_duration_minutes: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TableDto {
    pub id: String,
    pub venue_id: String,
    pub table_number: String,
    pub capacity: u32,
    pub is_active: bool,
}

impl From<&DiningTable> for TableDto {
    fn from(t: &DiningTable) -> Self {
        Self {
            id: t.id.clone(),
            venue_id: t.venue_id.clone(),
            table_number: t.table_number.clone(),
            capacity: t.capacity,
            is_active: t.is_active,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTableRequest {
    #[validate(length(min = 1, max = 20, message = "table number is required"))]
    pub table_number: String,
    #[validate(range(min = 1, max = 50, message = "capacity must be 1-50"))]
    pub capacity: u32,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CapacityQuery {
    /// `all`, `2`, `4` or `6+`
    pub capacity: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BoardQuery {
    /// `YYYY-MM-DD`
    pub date: NaiveDate,
    /// `all`, `2`, `4` or `6+`
    pub capacity: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DateQuery {
    /// `YYYY-MM-DD`
    pub date: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BoardDto {
    pub venue_id: String,
    pub venue_name: String,
    pub date: NaiveDate,
    pub slots: Vec<String>,
    pub tables: Vec<BoardRowDto>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BoardRowDto {
    pub table: TableDto,
    pub cells: Vec<BoardCellDto>,
}

/// `status` is `available`, `booked` or `in_progress`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BoardCellDto {
    pub time: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewers: Option<usize>,
}

impl From<Board> for BoardDto {
    fn from(board: Board) -> Self {
        let tables = board
            .tables
            .into_iter()
            .map(|row| BoardRowDto {
                table: TableDto::from(&row.table),
                cells: row
                    .slots
                    .into_iter()
                    .map(|cell| {
                        let time = format_slot(cell.time);
                        match cell.state {
                            SlotState::Available => BoardCellDto {
                                time,
                                status: "available".into(),
                                reservation_id: None,
                                guest_count: None,
                                viewers: None,
                            },
                            SlotState::Booked {
                                reservation_id,
                                guest_count,
                            } => BoardCellDto {
                                time,
                                status: "booked".into(),
                                reservation_id: Some(reservation_id),
                                guest_count: Some(guest_count),
                                viewers: None,
                            },
                            SlotState::InProgress { viewers } => BoardCellDto {
                                time,
                                status: "in_progress".into(),
                                reservation_id: None,
                                guest_count: None,
                                viewers: Some(viewers),
                            },
                        }
                    })
                    .collect(),
            })
            .collect();

        Self {
            venue_id: board.venue.id,
            venue_name: board.venue.name,
            date: board.date,
            slots: board.slot_times.into_iter().map(format_slot).collect(),
            tables,
        }
    }
}

/// A booking as seen by other guests of the venue: no customer details.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VenueBookingDto {
    pub id: String,
    pub table_id: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub guest_count: u32,
    pub status: String,
}

impl From<&Reservation> for VenueBookingDto {
    fn from(r: &Reservation) -> Self {
        Self {
            id: r.id.clone(),
            table_id: r.table_id.clone(),
            date: r.reservation_date,
            start_time: format_slot(r.start_time),
            end_time: format_slot(r.end_time),
            guest_count: r.guest_count,
            status: r.status.as_str().to_string(),
        }
    }
}

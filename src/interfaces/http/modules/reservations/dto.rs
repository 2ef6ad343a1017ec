//! Reservation DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::slot::format_slot;
use crate::domain::Reservation;

/// Customer fields are checked by the booking service so that a missing
/// one is reported by name; only upper bounds are enforced here.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReservationRequest {
    #[validate(length(min = 1, message = "venue_id is required"))]
    pub venue_id: String,
    #[validate(length(min = 1, message = "table_id is required"))]
    pub table_id: String,
    /// `YYYY-MM-DD`
    pub date: NaiveDate,
    /// `HH:MM`, one of the venue's slots
    pub start_time: String,
    pub guest_count: u32,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub customer_name: String,
    #[serde(default)]
    #[validate(length(max = 254))]
    pub customer_email: String,
    #[serde(default)]
    #[validate(length(max = 32))]
    pub customer_phone: String,
    #[validate(length(max = 32))]
    pub member_number: Option<String>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReservationDto {
    pub id: String,
    pub user_id: String,
    pub venue_id: String,
    pub table_id: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub guest_count: u32,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub member_number: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Reservation> for ReservationDto {
    fn from(r: &Reservation) -> Self {
        Self {
            id: r.id.clone(),
            user_id: r.user_id.clone(),
            venue_id: r.venue_id.clone(),
            table_id: r.table_id.clone(),
            date: r.reservation_date,
            start_time: format_slot(r.start_time),
            end_time: format_slot(r.end_time),
            guest_count: r.guest_count,
            customer_name: r.customer.name.clone(),
            customer_email: r.customer.email.clone(),
            customer_phone: r.customer.phone.clone(),
            member_number: r.customer.member_number.clone(),
            notes: r.customer.notes.clone(),
            status: r.status.as_str().to_string(),
            created_at: r.created_at,
        }
    }
}

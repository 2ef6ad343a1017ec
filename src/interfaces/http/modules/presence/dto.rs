//! Presence DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::slot::{format_slot, parse_slot};
use crate::domain::{SlotKey, SlotPresence};
use crate::interfaces::http::error::ApiError;

/// Identifies the slot in query strings.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SlotQuery {
    pub venue_id: String,
    pub table_id: String,
    /// `YYYY-MM-DD`
    pub date: NaiveDate,
    /// `HH:MM`
    pub time: String,
}

impl SlotQuery {
    pub fn slot_key(&self) -> Result<SlotKey, ApiError> {
        slot_key(&self.venue_id, &self.table_id, self.date, &self.time)
    }
}

pub fn slot_key(
    venue_id: &str,
    table_id: &str,
    date: NaiveDate,
    time: &str,
) -> Result<SlotKey, ApiError> {
    if venue_id.trim().is_empty() || table_id.trim().is_empty() {
        return Err(ApiError::bad_request("venue_id and table_id are required"));
    }
    let time = parse_slot(time).ok_or_else(|| ApiError::bad_request("time must be HH:MM"))?;
    Ok(SlotKey::new(venue_id.trim(), table_id.trim(), date, time))
}

/// Begin or refresh viewing. Send back the `presence_id` from the previous
/// response to refresh in place.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PresenceRequest {
    #[validate(length(min = 1, message = "venue_id is required"))]
    pub venue_id: String,
    #[validate(length(min = 1, message = "table_id is required"))]
    pub table_id: String,
    pub date: NaiveDate,
    pub time: String,
    pub presence_id: Option<String>,
}

/// `presence_id` is null when the store could not be reached; the client
/// simply keeps booking without a presence signal.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PresenceHandleDto {
    pub presence_id: Option<String>,
    pub ttl_secs: u64,
    pub refresh_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ViewerDto {
    pub presence_id: String,
    pub user_id: String,
    pub viewed_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<&SlotPresence> for ViewerDto {
    fn from(p: &SlotPresence) -> Self {
        Self {
            presence_id: p.id.clone(),
            user_id: p.user_id.clone(),
            viewed_at: p.viewed_at,
            expires_at: p.expires_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ViewerListDto {
    pub venue_id: String,
    pub table_id: String,
    pub date: NaiveDate,
    pub time: String,
    /// Live viewers other than the caller
    pub viewers: Vec<ViewerDto>,
}

impl ViewerListDto {
    pub fn new(slot: &SlotKey, viewers: &[SlotPresence]) -> Self {
        Self {
            venue_id: slot.venue_id.clone(),
            table_id: slot.table_id.clone(),
            date: slot.date,
            time: format_slot(slot.time),
            viewers: viewers.iter().map(ViewerDto::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_query_accepts_short_and_long_times() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let a = slot_key("v1", "t1", date, "18:30").unwrap();
        let b = slot_key("v1", "t1", date, "18:30:00").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn slot_query_rejects_garbage() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        assert!(slot_key("v1", "t1", date, "half past six").is_err());
        assert!(slot_key(" ", "t1", date, "18:30").is_err());
    }
}

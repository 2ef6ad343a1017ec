//! Venue domain entity

use chrono::{DateTime, NaiveTime, Utc};

use crate::domain::slot::{generate_slots, slot_end};
use crate::shared::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq)]
pub struct Venue {
    pub id: String,
    pub name: String,
    pub address: String,
    pub description: Option<String>,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
    pub slot_duration_minutes: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Venue {
    /// Build a venue, rejecting an empty operating window or a zero slot
    /// duration.
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        opening_time: NaiveTime,
        closing_time: NaiveTime,
        slot_duration_minutes: u32,
    ) -> DomainResult<Self> {
        if opening_time >= closing_time {
            return Err(DomainError::Validation(
                "opening_time must be before closing_time".into(),
            ));
        }
        if slot_duration_minutes == 0 {
            return Err(DomainError::Validation(
                "slot_duration_minutes must be positive".into(),
            ));
        }

        let now = Utc::now();
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            address: address.into(),
            description: None,
            opening_time,
            closing_time,
            slot_duration_minutes,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Bookable start times for any date at this venue.
    pub fn slots(&self) -> Vec<NaiveTime> {
        generate_slots(self.opening_time, self.closing_time, self.slot_duration_minutes)
    }

    pub fn offers_slot(&self, start: NaiveTime) -> bool {
        self.slots().contains(&start)
    }

    pub fn end_time_for(&self, start: NaiveTime) -> NaiveTime {
        slot_end(start, self.slot_duration_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::slot::parse_slot;

    fn t(s: &str) -> NaiveTime {
        parse_slot(s).unwrap()
    }

    #[test]
    fn rejects_inverted_window() {
        let err = Venue::new("Bistro", "1 Main St", t("22:00"), t("17:00"), 60).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn rejects_zero_duration() {
        let err = Venue::new("Bistro", "1 Main St", t("17:00"), t("22:00"), 0).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn offers_only_grid_slots() {
        let venue = Venue::new("Bistro", "1 Main St", t("17:00"), t("22:00"), 90).unwrap();
        assert_eq!(venue.slots().len(), 4);
        assert!(venue.offers_slot(t("18:30")));
        assert!(!venue.offers_slot(t("18:00")));
        assert!(!venue.offers_slot(t("22:00")));
        assert_eq!(venue.end_time_for(t("21:30")), t("23:00"));
    }
}

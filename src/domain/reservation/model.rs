//! Reservation domain entity

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::shared::DomainError;

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStatus {
    /// Awaiting confirmation
    Pending,
    /// Holding the slot
    Confirmed,
    /// Released; the slot is bookable again
    Cancelled,
    /// The party has been seated and left
    Completed,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Statuses that hold a slot exclusively.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    pub fn active() -> [ReservationStatus; 2] {
        [Self::Pending, Self::Confirmed]
    }
}

impl FromStr for ReservationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            other => Err(DomainError::Validation(format!(
                "unknown reservation status '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Contact details captured by the booking form
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub member_number: Option<String>,
    pub notes: Option<String>,
}

impl CustomerDetails {
    /// Names of required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("customer_name");
        }
        if self.email.trim().is_empty() {
            missing.push("customer_email");
        }
        if self.phone.trim().is_empty() {
            missing.push("customer_phone");
        }
        missing
    }
}

/// Table reservation
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub id: String,
    pub user_id: String,
    pub venue_id: String,
    pub table_id: String,
    pub reservation_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub guest_count: u32,
    pub customer: CustomerDetails,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// New confirmed reservation with a generated id.
    #[allow(clippy::too_many_arguments)]
    pub fn confirmed(
        user_id: impl Into<String>,
        venue_id: impl Into<String>,
        table_id: impl Into<String>,
        reservation_date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        guest_count: u32,
        customer: CustomerDetails,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            venue_id: venue_id.into(),
            table_id: table_id.into(),
            reservation_date,
            start_time,
            end_time,
            guest_count,
            customer,
            status: ReservationStatus::Confirmed,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Whether this reservation occupies the given (table, date, start) slot.
    pub fn holds(&self, table_id: &str, date: NaiveDate, start_time: NaiveTime) -> bool {
        self.is_active()
            && self.table_id == table_id
            && self.reservation_date == date
            && self.start_time == start_time
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::slot::parse_slot;

    fn customer() -> CustomerDetails {
        CustomerDetails {
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            phone: "+15550100".into(),
            member_number: None,
            notes: None,
        }
    }

    fn sample() -> Reservation {
        Reservation::confirmed(
            "u1",
            "v1",
            "t1",
            NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
            parse_slot("18:00").unwrap(),
            parse_slot("19:30").unwrap(),
            2,
            customer(),
        )
    }

    #[test]
    fn new_reservation_is_confirmed_and_active() {
        let r = sample();
        assert_eq!(r.status, ReservationStatus::Confirmed);
        assert!(r.is_active());
    }

    #[test]
    fn only_pending_and_confirmed_hold_slots() {
        let mut r = sample();
        let date = r.reservation_date;
        let start = r.start_time;
        assert!(r.holds("t1", date, start));
        assert!(!r.holds("t2", date, start));

        r.status = ReservationStatus::Pending;
        assert!(r.holds("t1", date, start));

        r.status = ReservationStatus::Cancelled;
        assert!(!r.holds("t1", date, start));

        r.status = ReservationStatus::Completed;
        assert!(!r.holds("t1", date, start));
    }

    #[test]
    fn status_strings_roundtrip() {
        for s in [
            ReservationStatus::Pending,
            ReservationStatus::Confirmed,
            ReservationStatus::Cancelled,
            ReservationStatus::Completed,
        ] {
            assert_eq!(s.as_str().parse::<ReservationStatus>().unwrap(), s);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = "bogus".parse::<ReservationStatus>().unwrap_err();
        assert!(matches!(err, DomainError::Validation(ref m) if m.contains("bogus")));
    }

    #[test]
    fn blank_contact_fields_are_reported() {
        let mut c = customer();
        assert!(c.missing_fields().is_empty());

        c.email = "  ".into();
        c.phone.clear();
        assert_eq!(c.missing_fields(), vec!["customer_email", "customer_phone"]);
    }
}

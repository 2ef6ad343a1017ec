//! Slot presence entity

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::slot::format_slot;

/// Identifies one bookable slot of one table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    pub venue_id: String,
    pub table_id: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl SlotKey {
    pub fn new(
        venue_id: impl Into<String>,
        table_id: impl Into<String>,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Self {
        Self {
            venue_id: venue_id.into(),
            table_id: table_id.into(),
            date,
            time,
        }
    }
}

impl std::fmt::Display for SlotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "slot:{}:{}:{}:{}",
            self.venue_id,
            self.table_id,
            self.date,
            format_slot(self.time)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlotPresence {
    pub id: String,
    pub user_id: String,
    pub slot: SlotKey,
    pub viewed_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SlotPresence {
    /// Still counts as "in progress" at `now`.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn live_until_strictly_before_expiry() {
        let now = Utc::now();
        let p = SlotPresence {
            id: "p1".into(),
            user_id: "u1".into(),
            slot: SlotKey::new(
                "v1",
                "t1",
                NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
                NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            ),
            viewed_at: now,
            expires_at: now + Duration::seconds(120),
        };

        assert!(p.is_live(now + Duration::seconds(60)));
        assert!(!p.is_live(now + Duration::seconds(120)));
        assert!(!p.is_live(now + Duration::seconds(121)));
    }

    #[test]
    fn slot_key_display_is_a_channel_topic() {
        let key = SlotKey::new(
            "v1",
            "t9",
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        );
        assert_eq!(key.to_string(), "slot:v1:t9:2026-01-05:09:30");
    }
}

//! Event types published on the bus

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::SlotKey;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    /// A presence row was created, refreshed or removed
    PresenceChanged(PresenceChangedEvent),
    /// A reservation was committed
    ReservationCreated(ReservationCreatedEvent),
}

impl Event {
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::PresenceChanged(_) => "presence_changed",
            Event::ReservationCreated(_) => "reservation_created",
        }
    }

    /// Table the event concerns
    pub fn table_id(&self) -> &str {
        match self {
            Event::PresenceChanged(e) => &e.slot.table_id,
            Event::ReservationCreated(e) => &e.table_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenceChange {
    Upserted,
    Refreshed,
    Removed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceChangedEvent {
    pub slot: SlotKey,
    pub user_id: Option<String>,
    pub change: PresenceChange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreatedEvent {
    pub reservation_id: String,
    pub venue_id: String,
    pub table_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
}

/// Envelope stamped on publish
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: Event,
}

impl EventMessage {
    pub fn new(event: Event) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event,
        }
    }
}

//! Application layer: use cases over the domain repositories

pub mod booking;
pub mod events;
pub mod notifications;
pub mod services;

pub use booking::{
    AvailabilityService, EndViewing, NewReservation, PresenceSettings, PresenceTracker,
    PresenceWatch, ReservationService, ViewingSession,
};
pub use events::{create_event_bus, Event, EventBus, SharedEventBus};
pub use notifications::NotificationDispatcher;

//! Booking use cases: presence, reservations and the availability board

pub mod availability;
pub mod presence;
pub mod reservations;

pub use availability::{AvailabilityService, Board, SlotCell, SlotState, TableRow};
pub use presence::{EndViewing, PresenceSettings, PresenceTracker, PresenceWatch, ViewingSession};
pub use reservations::{NewReservation, ReservationService, SLOT_TAKEN_MESSAGE};

//! Domain layer: entities, value types and repository interfaces
//!
//! Nothing in here touches the database or the network.

pub mod member;
pub mod presence;
pub mod repositories;
pub mod reservation;
pub mod slot;
pub mod table;
pub mod user;
pub mod venue;

pub use member::{Member, MemberRepository};
pub use presence::{PresenceRepository, SlotKey, SlotPresence};
pub use repositories::RepositoryProvider;
pub use reservation::{CustomerDetails, Reservation, ReservationRepository, ReservationStatus};
pub use table::{CapacityFilter, DiningTable, TableRepository};
pub use user::{User, UserRepository, UserRole};
pub use venue::{Venue, VenueRepository};

pub use crate::shared::errors::{DomainError, DomainResult};

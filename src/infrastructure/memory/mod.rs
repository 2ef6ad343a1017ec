//! In-memory repositories
//!
//! DashMap-backed implementations of every repository trait with the same
//! uniqueness rules as the SQL schema. Used by unit tests.

mod catalog;
mod presence;
mod reservations;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::domain::{
    MemberRepository, PresenceRepository, RepositoryProvider, ReservationRepository,
    TableRepository, UserRepository, VenueRepository,
};
use crate::shared::{DomainError, DomainResult};

pub use catalog::{InMemoryMemberRepository, InMemoryTableRepository, InMemoryUserRepository, InMemoryVenueRepository};
pub use presence::InMemoryPresenceRepository;
pub use reservations::InMemoryReservationRepository;

/// Switch shared by all repositories of one provider to simulate an outage.
#[derive(Clone, Default)]
pub(crate) struct Availability(Arc<AtomicBool>);

impl Availability {
    pub(crate) fn check(&self) -> DomainResult<()> {
        if self.0.load(Ordering::SeqCst) {
            Err(DomainError::Store("in-memory store unavailable".into()))
        } else {
            Ok(())
        }
    }
}

pub struct InMemoryRepositoryProvider {
    availability: Availability,
    venues: InMemoryVenueRepository,
    tables: InMemoryTableRepository,
    reservations: InMemoryReservationRepository,
    presence: InMemoryPresenceRepository,
    members: InMemoryMemberRepository,
    users: InMemoryUserRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        let availability = Availability::default();
        Self {
            venues: InMemoryVenueRepository::new(availability.clone()),
            tables: InMemoryTableRepository::new(availability.clone()),
            reservations: InMemoryReservationRepository::new(availability.clone()),
            presence: InMemoryPresenceRepository::new(availability.clone()),
            members: InMemoryMemberRepository::new(availability.clone()),
            users: InMemoryUserRepository::new(availability.clone()),
            availability,
        }
    }

    /// Make every subsequent call fail with `DomainError::Store`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.availability.0.store(unavailable, Ordering::SeqCst);
    }
}

impl Default for InMemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn venues(&self) -> &dyn VenueRepository {
        &self.venues
    }

    fn tables(&self) -> &dyn TableRepository {
        &self.tables
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }

    fn presence(&self) -> &dyn PresenceRepository {
        &self.presence
    }

    fn members(&self) -> &dyn MemberRepository {
        &self.members
    }

    fn users(&self) -> &dyn UserRepository {
        &self.users
    }
}

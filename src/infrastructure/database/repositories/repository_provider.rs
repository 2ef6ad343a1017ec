//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::{
    MemberRepository, PresenceRepository, RepositoryProvider, ReservationRepository,
    TableRepository, UserRepository, VenueRepository,
};

use super::member_repository::SeaOrmMemberRepository;
use super::presence_repository::SeaOrmPresenceRepository;
use super::reservation_repository::SeaOrmReservationRepository;
use super::table_repository::SeaOrmTableRepository;
use super::user_repository::SeaOrmUserRepository;
use super::venue_repository::SeaOrmVenueRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let venue = repos.venues().find_by_id("v1").await?;
/// let viewers = repos.presence().find_live_for_slot(&slot, now, Some("u1")).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    venues: SeaOrmVenueRepository,
    tables: SeaOrmTableRepository,
    reservations: SeaOrmReservationRepository,
    presence: SeaOrmPresenceRepository,
    members: SeaOrmMemberRepository,
    users: SeaOrmUserRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            venues: SeaOrmVenueRepository::new(db.clone()),
            tables: SeaOrmTableRepository::new(db.clone()),
            reservations: SeaOrmReservationRepository::new(db.clone()),
            presence: SeaOrmPresenceRepository::new(db.clone()),
            members: SeaOrmMemberRepository::new(db.clone()),
            users: SeaOrmUserRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
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

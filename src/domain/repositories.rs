//! Repository traits for the domain layer
//!
//! `RepositoryProvider` gives unified access to all per-aggregate
//! repositories so services depend on one handle:
//!
//! ```ignore
//! async fn handle(repos: &dyn RepositoryProvider) {
//!     let venue = repos.venues().find_by_id("v1").await?;
//!     let taken = repos.reservations().find_active_for_slot("t1", date, time).await?;
//! }
//! ```

use super::member::MemberRepository;
use super::presence::PresenceRepository;
use super::reservation::ReservationRepository;
use super::table::TableRepository;
use super::user::UserRepository;
use super::venue::VenueRepository;

pub trait RepositoryProvider: Send + Sync {
    fn venues(&self) -> &dyn VenueRepository;
    fn tables(&self) -> &dyn TableRepository;
    fn reservations(&self) -> &dyn ReservationRepository;
    fn presence(&self) -> &dyn PresenceRepository;
    fn members(&self) -> &dyn MemberRepository;
    fn users(&self) -> &dyn UserRepository;
}

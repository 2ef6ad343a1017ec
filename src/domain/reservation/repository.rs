//! Reservation repository interface

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

use super::model::Reservation;
use crate::shared::DomainResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Insert a new reservation.
    ///
    /// Fails with `DomainError::Conflict` when another pending or confirmed
    /// reservation already holds the same (table, date, start time). The
    /// check is enforced by the store itself and is atomic with the insert.
    async fn insert(&self, reservation: Reservation) -> DomainResult<Reservation>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>>;

    /// Pending or confirmed reservation holding the slot, if any
    async fn find_active_for_slot(
        &self,
        table_id: &str,
        date: NaiveDate,
        start_time: NaiveTime,
    ) -> DomainResult<Option<Reservation>>;

    /// Pending or confirmed reservations of a venue on a date
    async fn find_active_for_venue_on(
        &self,
        venue_id: &str,
        date: NaiveDate,
    ) -> DomainResult<Vec<Reservation>>;

    /// All reservations of a user, newest date first
    async fn find_for_user(&self, user_id: &str) -> DomainResult<Vec<Reservation>>;
}

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::Availability;
use crate::domain::{Reservation, ReservationRepository};
use crate::shared::{DomainError, DomainResult};

type SlotIndexKey = (String, NaiveDate, NaiveTime);

pub struct InMemoryReservationRepository {
    availability: Availability,
    reservations: DashMap<String, Reservation>,
    /// (table, date, start) -> id of the active reservation holding it
    active_slots: DashMap<SlotIndexKey, String>,
}

impl InMemoryReservationRepository {
    pub(crate) fn new(availability: Availability) -> Self {
        Self {
            availability,
            reservations: DashMap::new(),
            active_slots: DashMap::new(),
        }
    }
}

#[async_trait]
impl ReservationRepository for InMemoryReservationRepository {
    async fn insert(&self, reservation: Reservation) -> DomainResult<Reservation> {
        self.availability.check()?;

        if reservation.is_active() {
            let key = (
                reservation.table_id.clone(),
                reservation.reservation_date,
                reservation.start_time,
            );
            // The shard lock held by the entry makes check-and-claim atomic
            match self.active_slots.entry(key) {
                Entry::Occupied(_) => {
                    return Err(DomainError::Conflict(format!(
                        "table {} on {} at {}",
                        reservation.table_id,
                        reservation.reservation_date,
                        reservation.start_time.format("%H:%M")
                    )))
                }
                Entry::Vacant(slot) => {
                    slot.insert(reservation.id.clone());
                }
            }
        }

        self.reservations
            .insert(reservation.id.clone(), reservation.clone());
        Ok(reservation)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>> {
        self.availability.check()?;
        Ok(self.reservations.get(id).map(|r| r.clone()))
    }

    async fn find_active_for_slot(
        &self,
        table_id: &str,
        date: NaiveDate,
        start_time: NaiveTime,
    ) -> DomainResult<Option<Reservation>> {
        self.availability.check()?;
        let key = (table_id.to_string(), date, start_time);
        let Some(id) = self.active_slots.get(&key).map(|id| id.clone()) else {
            return Ok(None);
        };
        Ok(self.reservations.get(&id).map(|r| r.clone()))
    }

    async fn find_active_for_venue_on(
        &self,
        venue_id: &str,
        date: NaiveDate,
    ) -> DomainResult<Vec<Reservation>> {
        self.availability.check()?;
        let mut found: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|r| r.venue_id == venue_id && r.reservation_date == date && r.is_active())
            .map(|r| r.clone())
            .collect();
        found.sort_by_key(|r| r.start_time);
        Ok(found)
    }

    async fn find_for_user(&self, user_id: &str) -> DomainResult<Vec<Reservation>> {
        self.availability.check()?;
        let mut found: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.clone())
            .collect();
        found.sort_by(|a, b| {
            (b.reservation_date, b.start_time).cmp(&(a.reservation_date, a.start_time))
        });
        Ok(found)
    }
}

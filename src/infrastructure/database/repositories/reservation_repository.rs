//! SeaORM implementation of ReservationRepository

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use log::{debug, warn};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::{db_err, from_db_count, is_unique_violation, to_db_count};
use crate::domain::reservation::{
    CustomerDetails, Reservation, ReservationRepository, ReservationStatus,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::reservation;

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: reservation::Model) -> Reservation {
    // An unreadable status must not hold the slot
    let status = m.status.parse().unwrap_or_else(|e| {
        warn!("Reservation {} has unreadable status: {}", m.id, e);
        ReservationStatus::Cancelled
    });

    Reservation {
        id: m.id,
        user_id: m.user_id,
        venue_id: m.venue_id,
        table_id: m.table_id,
        reservation_date: m.reservation_date,
        start_time: m.start_time,
        end_time: m.end_time,
        guest_count: from_db_count(m.guest_count),
        customer: CustomerDetails {
            name: m.customer_name,
            email: m.customer_email,
            phone: m.customer_phone,
            member_number: m.member_number,
            notes: m.notes,
        },
        status,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn active_statuses() -> Vec<&'static str> {
    ReservationStatus::active().iter().map(|s| s.as_str()).collect()
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn insert(&self, r: Reservation) -> DomainResult<Reservation> {
        debug!(
            "Inserting reservation {} for table {} on {} at {}",
            r.id, r.table_id, r.reservation_date, r.start_time
        );

        let model = reservation::ActiveModel {
            id: Set(r.id.clone()),
            user_id: Set(r.user_id.clone()),
            venue_id: Set(r.venue_id.clone()),
            table_id: Set(r.table_id.clone()),
            reservation_date: Set(r.reservation_date),
            start_time: Set(r.start_time),
            end_time: Set(r.end_time),
            guest_count: Set(to_db_count(r.guest_count)),
            customer_name: Set(r.customer.name.clone()),
            customer_email: Set(r.customer.email.clone()),
            customer_phone: Set(r.customer.phone.clone()),
            member_number: Set(r.customer.member_number.clone()),
            notes: Set(r.customer.notes.clone()),
            status: Set(r.status.as_str().to_string()),
            created_at: Set(r.created_at),
            updated_at: Set(r.updated_at),
        };

        match model.insert(&self.db).await {
            Ok(saved) => Ok(model_to_domain(saved)),
            Err(e) if is_unique_violation(&e) => {
                warn!(
                    "Active slot already held: table {} on {} at {}",
                    r.table_id, r.reservation_date, r.start_time
                );
                Err(DomainError::Conflict(format!(
                    "table {} on {} at {}",
                    r.table_id,
                    r.reservation_date,
                    r.start_time.format("%H:%M")
                )))
            }
            Err(e) => Err(db_err(e)),
        }
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>> {
        let model = reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_active_for_slot(
        &self,
        table_id: &str,
        date: NaiveDate,
        start_time: NaiveTime,
    ) -> DomainResult<Option<Reservation>> {
        let model = reservation::Entity::find()
            .filter(reservation::Column::TableId.eq(table_id))
            .filter(reservation::Column::ReservationDate.eq(date))
            .filter(reservation::Column::StartTime.eq(start_time))
            .filter(reservation::Column::Status.is_in(active_statuses()))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_active_for_venue_on(
        &self,
        venue_id: &str,
        date: NaiveDate,
    ) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::VenueId.eq(venue_id))
            .filter(reservation::Column::ReservationDate.eq(date))
            .filter(reservation::Column::Status.is_in(active_statuses()))
            .order_by_asc(reservation::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_for_user(&self, user_id: &str) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::UserId.eq(user_id))
            .order_by_desc(reservation::Column::ReservationDate)
            .order_by_desc(reservation::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}

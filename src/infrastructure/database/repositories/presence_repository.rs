//! SeaORM implementation of PresenceRepository

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Select, Set,
};

use super::db_err;
use crate::domain::{DomainError, DomainResult, PresenceRepository, SlotKey, SlotPresence};
use crate::infrastructure::database::entities::slot_presence;

pub struct SeaOrmPresenceRepository {
    db: DatabaseConnection,
}

impl SeaOrmPresenceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: slot_presence::Model) -> SlotPresence {
    SlotPresence {
        id: m.id,
        user_id: m.user_id,
        slot: SlotKey {
            venue_id: m.venue_id,
            table_id: m.table_id,
            date: m.slot_date,
            time: m.slot_time,
        },
        viewed_at: m.viewed_at,
        expires_at: m.expires_at,
    }
}

fn for_slot(slot: &SlotKey) -> Select<slot_presence::Entity> {
    slot_presence::Entity::find()
        .filter(slot_presence::Column::VenueId.eq(slot.venue_id.as_str()))
        .filter(slot_presence::Column::TableId.eq(slot.table_id.as_str()))
        .filter(slot_presence::Column::SlotDate.eq(slot.date))
        .filter(slot_presence::Column::SlotTime.eq(slot.time))
}

#[async_trait]
impl PresenceRepository for SeaOrmPresenceRepository {
    async fn upsert(
        &self,
        user_id: &str,
        slot: &SlotKey,
        viewed_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<SlotPresence> {
        let model = slot_presence::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            user_id: Set(user_id.to_string()),
            venue_id: Set(slot.venue_id.clone()),
            table_id: Set(slot.table_id.clone()),
            slot_date: Set(slot.date),
            slot_time: Set(slot.time),
            viewed_at: Set(viewed_at),
            expires_at: Set(expires_at),
        };

        // On a natural-key clash the existing row keeps its id
        slot_presence::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    slot_presence::Column::UserId,
                    slot_presence::Column::VenueId,
                    slot_presence::Column::TableId,
                    slot_presence::Column::SlotDate,
                    slot_presence::Column::SlotTime,
                ])
                .update_columns([
                    slot_presence::Column::ViewedAt,
                    slot_presence::Column::ExpiresAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err)?;

        let row = for_slot(slot)
            .filter(slot_presence::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::Store(format!("presence row for {slot} vanished")))?;

        debug!("Presence upserted: {} by {}", slot, user_id);
        Ok(model_to_domain(row))
    }

    async fn touch(
        &self,
        id: &str,
        user_id: &str,
        slot: &SlotKey,
        viewed_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<bool> {
        let result = slot_presence::Entity::update_many()
            .filter(slot_presence::Column::Id.eq(id))
            .filter(slot_presence::Column::UserId.eq(user_id))
            .filter(slot_presence::Column::VenueId.eq(slot.venue_id.as_str()))
            .filter(slot_presence::Column::TableId.eq(slot.table_id.as_str()))
            .filter(slot_presence::Column::SlotDate.eq(slot.date))
            .filter(slot_presence::Column::SlotTime.eq(slot.time))
            .col_expr(slot_presence::Column::ViewedAt, Expr::value(viewed_at))
            .col_expr(slot_presence::Column::ExpiresAt, Expr::value(expires_at))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<SlotPresence>> {
        let model = slot_presence::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn delete(&self, id: &str, user_id: &str) -> DomainResult<bool> {
        let result = slot_presence::Entity::delete_many()
            .filter(slot_presence::Column::Id.eq(id))
            .filter(slot_presence::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected > 0 {
            debug!("Presence {} removed by {}", id, user_id);
        }
        Ok(result.rows_affected > 0)
    }

    async fn find_live_for_slot(
        &self,
        slot: &SlotKey,
        now: DateTime<Utc>,
        excluding_user: Option<&str>,
    ) -> DomainResult<Vec<SlotPresence>> {
        let mut query = for_slot(slot).filter(slot_presence::Column::ExpiresAt.gt(now));
        if let Some(user_id) = excluding_user {
            query = query.filter(slot_presence::Column::UserId.ne(user_id));
        }

        let models = query
            .order_by_asc(slot_presence::Column::ViewedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_live_for_venue_on(
        &self,
        venue_id: &str,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<SlotPresence>> {
        let models = slot_presence::Entity::find()
            .filter(slot_presence::Column::VenueId.eq(venue_id))
            .filter(slot_presence::Column::SlotDate.eq(date))
            .filter(slot_presence::Column::ExpiresAt.gt(now))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> DomainResult<u64> {
        let result = slot_presence::Entity::delete_many()
            .filter(slot_presence::Column::ExpiresAt.lte(now))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }
}

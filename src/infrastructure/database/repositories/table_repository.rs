//! SeaORM implementation of TableRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use super::{db_err, from_db_count, is_unique_violation, to_db_count};
use crate::domain::{DiningTable, DomainError, DomainResult, TableRepository};
use crate::infrastructure::database::entities::restaurant_table;

pub struct SeaOrmTableRepository {
    db: DatabaseConnection,
}

impl SeaOrmTableRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: restaurant_table::Model) -> DiningTable {
    DiningTable {
        id: m.id,
        venue_id: m.venue_id,
        table_number: m.table_number,
        capacity: from_db_count(m.capacity),
        is_active: m.is_active,
        created_at: m.created_at,
    }
}

#[async_trait]
impl TableRepository for SeaOrmTableRepository {
    async fn save(&self, t: DiningTable) -> DomainResult<()> {
        debug!("Saving table {} of venue {}", t.table_number, t.venue_id);

        let number = t.table_number.clone();
        let model = restaurant_table::ActiveModel {
            id: Set(t.id),
            venue_id: Set(t.venue_id),
            table_number: Set(t.table_number),
            capacity: Set(to_db_count(t.capacity)),
            is_active: Set(t.is_active),
            created_at: Set(t.created_at),
        };
        restaurant_table::Entity::insert(model)
            .on_conflict(
                OnConflict::column(restaurant_table::Column::Id)
                    .update_columns([
                        restaurant_table::Column::TableNumber,
                        restaurant_table::Column::Capacity,
                        restaurant_table::Column::IsActive,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::Conflict(format!("table number {number} already exists"))
                } else {
                    db_err(e)
                }
            })?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<DiningTable>> {
        let model = restaurant_table::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_active_for_venue(&self, venue_id: &str) -> DomainResult<Vec<DiningTable>> {
        let models = restaurant_table::Entity::find()
            .filter(restaurant_table::Column::VenueId.eq(venue_id))
            .filter(restaurant_table::Column::IsActive.eq(true))
            .order_by_asc(restaurant_table::Column::TableNumber)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}

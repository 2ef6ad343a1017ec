//! SeaORM implementation of VenueRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, Set};

use super::{db_err, from_db_count, to_db_count};
use crate::domain::{DomainResult, Venue, VenueRepository};
use crate::infrastructure::database::entities::venue;

pub struct SeaOrmVenueRepository {
    db: DatabaseConnection,
}

impl SeaOrmVenueRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: venue::Model) -> Venue {
    Venue {
        id: m.id,
        name: m.name,
        address: m.address,
        description: m.description,
        opening_time: m.opening_time,
        closing_time: m.closing_time,
        slot_duration_minutes: from_db_count(m.slot_duration_minutes),
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

#[async_trait]
impl VenueRepository for SeaOrmVenueRepository {
    async fn save(&self, v: Venue) -> DomainResult<()> {
        debug!("Saving venue: {} ({})", v.name, v.id);

        let model = venue::ActiveModel {
            id: Set(v.id),
            name: Set(v.name),
            address: Set(v.address),
            description: Set(v.description),
            opening_time: Set(v.opening_time),
            closing_time: Set(v.closing_time),
            slot_duration_minutes: Set(to_db_count(v.slot_duration_minutes)),
            created_at: Set(v.created_at),
            updated_at: Set(v.updated_at),
        };
        venue::Entity::insert(model)
            .on_conflict(
                OnConflict::column(venue::Column::Id)
                    .update_columns([
                        venue::Column::Name,
                        venue::Column::Address,
                        venue::Column::Description,
                        venue::Column::OpeningTime,
                        venue::Column::ClosingTime,
                        venue::Column::SlotDurationMinutes,
                        venue::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Venue>> {
        let model = venue::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Venue>> {
        let models = venue::Entity::find()
            .order_by_asc(venue::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}

//! Dining table repository interface

use async_trait::async_trait;

use super::model::DiningTable;
use crate::shared::DomainResult;

#[async_trait]
pub trait TableRepository: Send + Sync {
    async fn save(&self, table: DiningTable) -> DomainResult<()>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<DiningTable>>;

    /// Active tables of a venue, ordered by table number
    async fn find_active_for_venue(&self, venue_id: &str) -> DomainResult<Vec<DiningTable>>;
}

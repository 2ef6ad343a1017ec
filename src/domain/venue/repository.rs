//! Venue repository interface

use async_trait::async_trait;

use super::model::Venue;
use crate::shared::DomainResult;

#[async_trait]
pub trait VenueRepository: Send + Sync {
    async fn save(&self, venue: Venue) -> DomainResult<()>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Venue>>;

    /// All venues ordered by name
    async fn find_all(&self) -> DomainResult<Vec<Venue>>;
}

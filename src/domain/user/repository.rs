use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::User;
use crate::shared::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `DomainError::Conflict` if the username or email is taken
    async fn create(&self, user: User) -> DomainResult<()>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>>;

    /// Matches either the username or the email
    async fn find_by_login(&self, login: &str) -> DomainResult<Option<User>>;

    async fn count(&self) -> DomainResult<u64>;

    async fn record_login(&self, id: &str, at: DateTime<Utc>) -> DomainResult<()>;
}

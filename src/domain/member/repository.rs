//! Member repository interface

use async_trait::async_trait;

use super::model::Member;
use crate::shared::DomainResult;

#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn save(&self, member: Member) -> DomainResult<()>;

    /// Exact match on the trimmed member number
    async fn find_by_member_number(&self, member_number: &str) -> DomainResult<Option<Member>>;
}

//! Slot presence repository interface

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use super::model::{SlotKey, SlotPresence};
use crate::shared::DomainResult;

#[async_trait]
pub trait PresenceRepository: Send + Sync {
    /// Insert or refresh the row keyed by (user, venue, table, date, time).
    ///
    /// Concurrent calls for the same natural key converge on one row; the
    /// last writer's timestamps win.
    async fn upsert(
        &self,
        user_id: &str,
        slot: &SlotKey,
        viewed_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<SlotPresence>;

    /// Refresh a row by id. Only a row owned by `user_id` for exactly
    /// `slot` matches; returns `false` when there is no such row.
    async fn touch(
        &self,
        id: &str,
        user_id: &str,
        slot: &SlotKey,
        viewed_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<bool>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<SlotPresence>>;

    /// Delete a row owned by `user_id`. Returns `false` when nothing matched.
    async fn delete(&self, id: &str, user_id: &str) -> DomainResult<bool>;

    /// Unexpired rows for one slot, excluding `excluding_user`
    async fn find_live_for_slot(
        &self,
        slot: &SlotKey,
        now: DateTime<Utc>,
        excluding_user: Option<&str>,
    ) -> DomainResult<Vec<SlotPresence>>;

    /// Unexpired rows for every slot of a venue on a date
    async fn find_live_for_venue_on(
        &self,
        venue_id: &str,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<SlotPresence>>;

    /// Physically remove expired rows; returns how many were removed.
    async fn delete_expired(&self, now: DateTime<Utc>) -> DomainResult<u64>;
}

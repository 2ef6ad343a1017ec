use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::Availability;
use crate::domain::{PresenceRepository, SlotKey, SlotPresence};
use crate::shared::DomainResult;

pub struct InMemoryPresenceRepository {
    availability: Availability,
    rows: DashMap<String, SlotPresence>,
    /// Natural key (user, slot) -> row id
    by_key: DashMap<(String, SlotKey), String>,
}

impl InMemoryPresenceRepository {
    pub(crate) fn new(availability: Availability) -> Self {
        Self {
            availability,
            rows: DashMap::new(),
            by_key: DashMap::new(),
        }
    }

    fn remove_row(&self, id: &str) {
        if let Some((_, row)) = self.rows.remove(id) {
            self.by_key
                .remove_if(&(row.user_id, row.slot), |_, owner| owner == id);
        }
    }

    fn remove_owned(&self, id: &str, user_id: &str) -> bool {
        match self.rows.remove_if(id, |_, row| row.user_id == user_id) {
            Some((_, row)) => {
                self.by_key
                    .remove_if(&(row.user_id, row.slot), |_, owner| owner == id);
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl PresenceRepository for InMemoryPresenceRepository {
    async fn upsert(
        &self,
        user_id: &str,
        slot: &SlotKey,
        viewed_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<SlotPresence> {
        self.availability.check()?;

        let row = match self.by_key.entry((user_id.to_string(), slot.clone())) {
            Entry::Occupied(existing) => {
                let id = existing.get().clone();
                let mut row = self.rows.entry(id.clone()).or_insert_with(|| SlotPresence {
                    id,
                    user_id: user_id.to_string(),
                    slot: slot.clone(),
                    viewed_at,
                    expires_at,
                });
                row.viewed_at = viewed_at;
                row.expires_at = expires_at;
                row.clone()
            }
            Entry::Vacant(vacant) => {
                let row = SlotPresence {
                    id: uuid::Uuid::new_v4().to_string(),
                    user_id: user_id.to_string(),
                    slot: slot.clone(),
                    viewed_at,
                    expires_at,
                };
                self.rows.insert(row.id.clone(), row.clone());
                vacant.insert(row.id.clone());
                row
            }
        };
        Ok(row)
    }

    async fn touch(
        &self,
        id: &str,
        user_id: &str,
        slot: &SlotKey,
        viewed_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<bool> {
        self.availability.check()?;
        match self.rows.get_mut(id) {
            Some(mut row) if row.user_id == user_id && &row.slot == slot => {
                row.viewed_at = viewed_at;
                row.expires_at = expires_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<SlotPresence>> {
        self.availability.check()?;
        Ok(self.rows.get(id).map(|row| row.clone()))
    }

    async fn delete(&self, id: &str, user_id: &str) -> DomainResult<bool> {
        self.availability.check()?;
        Ok(self.remove_owned(id, user_id))
    }

    async fn find_live_for_slot(
        &self,
        slot: &SlotKey,
        now: DateTime<Utc>,
        excluding_user: Option<&str>,
    ) -> DomainResult<Vec<SlotPresence>> {
        self.availability.check()?;
        let mut rows: Vec<SlotPresence> = self
            .rows
            .iter()
            .filter(|p| &p.slot == slot && p.is_live(now))
            .filter(|p| Some(p.user_id.as_str()) != excluding_user)
            .map(|p| p.clone())
            .collect();
        rows.sort_by_key(|p| p.viewed_at);
        Ok(rows)
    }

    async fn find_live_for_venue_on(
        &self,
        venue_id: &str,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<SlotPresence>> {
        self.availability.check()?;
        Ok(self
            .rows
            .iter()
            .filter(|p| p.slot.venue_id == venue_id && p.slot.date == date && p.is_live(now))
            .map(|p| p.clone())
            .collect())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> DomainResult<u64> {
        self.availability.check()?;
        let expired: Vec<String> = self
            .rows
            .iter()
            .filter(|p| !p.is_live(now))
            .map(|p| p.id.clone())
            .collect();
        for id in &expired {
            self.remove_row(id);
        }
        Ok(expired.len() as u64)
    }
}

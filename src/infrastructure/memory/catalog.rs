//! Venues, tables, members and users

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use super::Availability;
use crate::domain::{
    DiningTable, Member, MemberRepository, TableRepository, User, UserRepository, Venue,
    VenueRepository,
};
use crate::shared::{DomainError, DomainResult};

pub struct InMemoryVenueRepository {
    availability: Availability,
    venues: DashMap<String, Venue>,
}

impl InMemoryVenueRepository {
    pub(crate) fn new(availability: Availability) -> Self {
        Self {
            availability,
            venues: DashMap::new(),
        }
    }
}

#[async_trait]
impl VenueRepository for InMemoryVenueRepository {
    async fn save(&self, venue: Venue) -> DomainResult<()> {
        self.availability.check()?;
        self.venues.insert(venue.id.clone(), venue);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Venue>> {
        self.availability.check()?;
        Ok(self.venues.get(id).map(|v| v.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Venue>> {
        self.availability.check()?;
        let mut all: Vec<Venue> = self.venues.iter().map(|v| v.clone()).collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }
}

pub struct InMemoryTableRepository {
    availability: Availability,
    tables: DashMap<String, DiningTable>,
}

impl InMemoryTableRepository {
    pub(crate) fn new(availability: Availability) -> Self {
        Self {
            availability,
            tables: DashMap::new(),
        }
    }
}

#[async_trait]
impl TableRepository for InMemoryTableRepository {
    async fn save(&self, table: DiningTable) -> DomainResult<()> {
        self.availability.check()?;
        self.tables.insert(table.id.clone(), table);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<DiningTable>> {
        self.availability.check()?;
        Ok(self.tables.get(id).map(|t| t.clone()))
    }

    async fn find_active_for_venue(&self, venue_id: &str) -> DomainResult<Vec<DiningTable>> {
        self.availability.check()?;
        let mut tables: Vec<DiningTable> = self
            .tables
            .iter()
            .filter(|t| t.venue_id == venue_id && t.is_active)
            .map(|t| t.clone())
            .collect();
        tables.sort_by(|a, b| a.table_number.cmp(&b.table_number));
        Ok(tables)
    }
}

pub struct InMemoryMemberRepository {
    availability: Availability,
    members: DashMap<String, Member>,
}

impl InMemoryMemberRepository {
    pub(crate) fn new(availability: Availability) -> Self {
        Self {
            availability,
            members: DashMap::new(),
        }
    }
}

#[async_trait]
impl MemberRepository for InMemoryMemberRepository {
    async fn save(&self, member: Member) -> DomainResult<()> {
        self.availability.check()?;
        self.members.insert(member.member_number.clone(), member);
        Ok(())
    }

    async fn find_by_member_number(&self, member_number: &str) -> DomainResult<Option<Member>> {
        self.availability.check()?;
        Ok(self.members.get(member_number.trim()).map(|m| m.clone()))
    }
}

pub struct InMemoryUserRepository {
    availability: Availability,
    users: DashMap<String, User>,
}

impl InMemoryUserRepository {
    pub(crate) fn new(availability: Availability) -> Self {
        Self {
            availability,
            users: DashMap::new(),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> DomainResult<()> {
        self.availability.check()?;
        let taken = self
            .users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email);
        if taken {
            return Err(DomainError::Conflict(
                "Username or email already exists".into(),
            ));
        }
        self.users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        self.availability.check()?;
        Ok(self.users.get(id).map(|u| u.clone()))
    }

    async fn find_by_login(&self, login: &str) -> DomainResult<Option<User>> {
        self.availability.check()?;
        Ok(self
            .users
            .iter()
            .find(|u| u.username == login || u.email == login)
            .map(|u| u.clone()))
    }

    async fn count(&self) -> DomainResult<u64> {
        self.availability.check()?;
        Ok(self.users.len() as u64)
    }

    async fn record_login(&self, id: &str, at: DateTime<Utc>) -> DomainResult<()> {
        self.availability.check()?;
        if let Some(mut user) = self.users.get_mut(id) {
            user.last_login_at = Some(at);
        }
        Ok(())
    }
}

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use sea_orm::DatabaseConnection;

use tablerez::domain::{CustomerDetails, DiningTable, RepositoryProvider, User, UserRole, Venue};
use tablerez::infrastructure::{init_database, run_migrations, DatabaseConfig};
use tablerez::SeaOrmRepositoryProvider;

pub async fn migrated_db() -> DatabaseConnection {
    let db = init_database(&DatabaseConfig::in_memory()).await.unwrap();
    run_migrations(&db).await.unwrap();
    db
}

pub struct Fixture {
    pub db: DatabaseConnection,
    pub repos: Arc<dyn RepositoryProvider>,
    pub alice: User,
    pub bob: User,
    pub admin: User,
    pub venue: Venue,
    /// Seats four
    pub table: DiningTable,
    /// Seats two
    pub small_table: DiningTable,
}

pub fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn booking_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 11, 20).unwrap()
}

pub fn customer(name: &str) -> CustomerDetails {
    CustomerDetails {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        phone: "+15550100".to_string(),
        member_number: None,
        notes: None,
    }
}

/// Two guests, one admin, a 17:00-22:00 venue with 60-minute slots and
/// two tables, all stored in a fresh in-memory SQLite database.
pub async fn seeded() -> Fixture {
    let db = migrated_db().await;
    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

    let alice = User::new("alice", "alice@example.com", "x", UserRole::Guest);
    let bob = User::new("bob", "bob@example.com", "x", UserRole::Guest);
    let admin = User::new("root", "root@example.com", "x", UserRole::Admin);
    for user in [&alice, &bob, &admin] {
        repos.users().create(user.clone()).await.unwrap();
    }

    let venue = Venue::new("Harbour Club", "1 Quay St", hm(17, 0), hm(22, 0), 60).unwrap();
    repos.venues().save(venue.clone()).await.unwrap();

    let table = DiningTable::new(&venue.id, "4", 4).unwrap();
    let small_table = DiningTable::new(&venue.id, "2", 2).unwrap();
    repos.tables().save(table.clone()).await.unwrap();
    repos.tables().save(small_table.clone()).await.unwrap();

    Fixture {
        db,
        repos,
        alice,
        bob,
        admin,
        venue,
        table,
        small_table,
    }
}

//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20260101_000001_create_users;
mod m20260101_000002_create_venues;
mod m20260101_000003_create_restaurant_tables;
mod m20260101_000004_create_members;
mod m20260101_000005_create_reservations;
mod m20260101_000006_create_slot_presence;

pub use m20260101_000005_create_reservations::ACTIVE_SLOT_INDEX;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_users::Migration),
            Box::new(m20260101_000002_create_venues::Migration),
            Box::new(m20260101_000003_create_restaurant_tables::Migration),
            Box::new(m20260101_000004_create_members::Migration),
            Box::new(m20260101_000005_create_reservations::Migration),
            Box::new(m20260101_000006_create_slot_presence::Migration),
        ]
    }
}

//! Create reservations table
//!
//! At most one pending or confirmed reservation may hold a
//! (table, date, start time). The partial unique index below enforces it;
//! cancelled and completed rows do not count.

use sea_orm_migration::prelude::*;

use super::m20260101_000001_create_users::Users;
use super::m20260101_000002_create_venues::Venues;
use super::m20260101_000003_create_restaurant_tables::RestaurantTables;

pub const ACTIVE_SLOT_INDEX: &str = "idx_reservations_active_slot";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reservations::UserId).string().not_null())
                    .col(ColumnDef::new(Reservations::VenueId).string().not_null())
                    .col(ColumnDef::new(Reservations::TableId).string().not_null())
                    .col(ColumnDef::new(Reservations::ReservationDate).date().not_null())
                    .col(ColumnDef::new(Reservations::StartTime).time().not_null())
                    .col(ColumnDef::new(Reservations::EndTime).time().not_null())
                    .col(
                        ColumnDef::new(Reservations::GuestCount)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Reservations::CustomerName).string().not_null())
                    .col(ColumnDef::new(Reservations::CustomerEmail).string().not_null())
                    .col(ColumnDef::new(Reservations::CustomerPhone).string().not_null())
                    .col(ColumnDef::new(Reservations::MemberNumber).string())
                    .col(ColumnDef::new(Reservations::Notes).text())
                    .col(
                        ColumnDef::new(Reservations::Status)
                            .string_len(20)
                            .not_null()
                            .default("confirmed"),
                    )
                    .col(
                        ColumnDef::new(Reservations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_user")
                            .from(Reservations::Table, Reservations::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_venue")
                            .from(Reservations::Table, Reservations::VenueId)
                            .to(Venues::Table, Venues::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_table")
                            .from(Reservations::Table, Reservations::TableId)
                            .to(RestaurantTables::Table, RestaurantTables::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_venue_date")
                    .table(Reservations::Table)
                    .col(Reservations::VenueId)
                    .col(Reservations::ReservationDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_user")
                    .table(Reservations::Table)
                    .col(Reservations::UserId)
                    .to_owned(),
            )
            .await?;

        // Partial indexes are not expressible through the index builder
        manager
            .get_connection()
            .execute_unprepared(&format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS {ACTIVE_SLOT_INDEX} \
                 ON reservations (table_id, reservation_date, start_time) \
                 WHERE status IN ('pending', 'confirmed')"
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reservations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Reservations {
    Table,
    Id,
    UserId,
    VenueId,
    TableId,
    ReservationDate,
    StartTime,
    EndTime,
    GuestCount,
    CustomerName,
    CustomerEmail,
    CustomerPhone,
    MemberNumber,
    Notes,
    Status,
    CreatedAt,
    UpdatedAt,
}

//! Create slot_presence table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SlotPresence::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SlotPresence::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SlotPresence::UserId).string().not_null())
                    .col(ColumnDef::new(SlotPresence::VenueId).string().not_null())
                    .col(ColumnDef::new(SlotPresence::TableId).string().not_null())
                    .col(ColumnDef::new(SlotPresence::SlotDate).date().not_null())
                    .col(ColumnDef::new(SlotPresence::SlotTime).time().not_null())
                    .col(
                        ColumnDef::new(SlotPresence::ViewedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SlotPresence::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_slot_presence_natural_key")
                    .table(SlotPresence::Table)
                    .col(SlotPresence::UserId)
                    .col(SlotPresence::VenueId)
                    .col(SlotPresence::TableId)
                    .col(SlotPresence::SlotDate)
                    .col(SlotPresence::SlotTime)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_slot_presence_expires")
                    .table(SlotPresence::Table)
                    .col(SlotPresence::ExpiresAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SlotPresence::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum SlotPresence {
    Table,
    Id,
    UserId,
    VenueId,
    TableId,
    SlotDate,
    SlotTime,
    ViewedAt,
    ExpiresAt,
}

//! Create venues table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Venues::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Venues::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Venues::Name).string().not_null())
                    .col(ColumnDef::new(Venues::Address).string().not_null())
                    .col(ColumnDef::new(Venues::Description).text())
                    .col(ColumnDef::new(Venues::OpeningTime).time().not_null())
                    .col(ColumnDef::new(Venues::ClosingTime).time().not_null())
                    .col(
                        ColumnDef::new(Venues::SlotDurationMinutes)
                            .integer()
                            .not_null()
                            .default(90),
                    )
                    .col(
                        ColumnDef::new(Venues::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Venues::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Venues::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Venues {
    Table,
    Id,
    Name,
    Address,
    Description,
    OpeningTime,
    ClosingTime,
    SlotDurationMinutes,
    CreatedAt,
    UpdatedAt,
}

//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod member_repository;
pub mod presence_repository;
pub mod repository_provider;
pub mod reservation_repository;
pub mod table_repository;
pub mod user_repository;
pub mod venue_repository;

use sea_orm::{DbErr, SqlErr};

use crate::shared::{DomainError, InfraError};

pub use repository_provider::SeaOrmRepositoryProvider;

pub(crate) fn db_err(e: DbErr) -> DomainError {
    InfraError::Database(e).into()
}

pub(crate) fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Counts are stored as i32 columns.
pub(crate) fn to_db_count(n: u32) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

pub(crate) fn from_db_count(n: i32) -> u32 {
    u32::try_from(n).unwrap_or(0)
}

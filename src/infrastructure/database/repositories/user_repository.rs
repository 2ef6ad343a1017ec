//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::prelude::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};

use super::{db_err, is_unique_violation};
use crate::domain::{DomainError, DomainResult, User, UserRepository, UserRole};
use crate::infrastructure::database::entities::user;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_role_to_domain(role: user::UserRole) -> UserRole {
    match role {
        user::UserRole::Admin => UserRole::Admin,
        user::UserRole::Guest => UserRole::Guest,
    }
}

fn domain_role_to_entity(role: UserRole) -> user::UserRole {
    match role {
        UserRole::Admin => user::UserRole::Admin,
        UserRole::Guest => user::UserRole::Guest,
    }
}

fn model_to_domain(m: user::Model) -> User {
    User {
        id: m.id,
        username: m.username,
        email: m.email,
        password_hash: m.password_hash,
        role: entity_role_to_domain(m.role),
        is_active: m.is_active,
        created_at: m.created_at,
        updated_at: m.updated_at,
        last_login_at: m.last_login_at,
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, u: User) -> DomainResult<()> {
        let model = user::ActiveModel {
            id: Set(u.id),
            username: Set(u.username),
            email: Set(u.email),
            password_hash: Set(u.password_hash),
            role: Set(domain_role_to_entity(u.role)),
            is_active: Set(u.is_active),
            created_at: Set(u.created_at),
            updated_at: Set(u.updated_at),
            last_login_at: Set(u.last_login_at),
        };
        model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::Conflict("Username or email already exists".into())
            } else {
                db_err(e)
            }
        })?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_login(&self, login: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Username.eq(login))
                    .add(user::Column::Email.eq(login)),
            )
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn count(&self) -> DomainResult<u64> {
        user::Entity::find().count(&self.db).await.map_err(db_err)
    }

    async fn record_login(&self, id: &str, at: DateTime<Utc>) -> DomainResult<()> {
        user::Entity::update_many()
            .filter(user::Column::Id.eq(id))
            .col_expr(user::Column::LastLoginAt, Expr::value(at))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}

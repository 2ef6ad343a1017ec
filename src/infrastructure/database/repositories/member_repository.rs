//! SeaORM implementation of MemberRepository

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set};

use super::db_err;
use crate::domain::{DomainResult, Member, MemberRepository};
use crate::infrastructure::database::entities::member;

pub struct SeaOrmMemberRepository {
    db: DatabaseConnection,
}

impl SeaOrmMemberRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MemberRepository for SeaOrmMemberRepository {
    async fn save(&self, m: Member) -> DomainResult<()> {
        let model = member::ActiveModel {
            member_number: Set(m.member_number),
            name: Set(m.name),
            email: Set(m.email),
            phone: Set(m.phone),
        };
        member::Entity::insert(model)
            .on_conflict(
                OnConflict::column(member::Column::MemberNumber)
                    .update_columns([
                        member::Column::Name,
                        member::Column::Email,
                        member::Column::Phone,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_by_member_number(&self, member_number: &str) -> DomainResult<Option<Member>> {
        let model = member::Entity::find_by_id(member_number.trim())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(|m| Member {
            member_number: m.member_number,
            name: m.name,
            email: m.email,
            phone: m.phone,
        }))
    }
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::Member;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MemberDto {
    pub member_number: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl From<Member> for MemberDto {
    fn from(m: Member) -> Self {
        Self {
            member_number: m.member_number,
            name: m.name,
            email: m.email,
            phone: m.phone,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMemberRequest {
    #[validate(length(min = 1, max = 32, message = "member_number is required"))]
    pub member_number: String,
    #[validate(length(min = 1, max = 200, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, max = 32, message = "phone is required"))]
    pub phone: String,
}

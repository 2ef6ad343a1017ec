//! Member entity

#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub member_number: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

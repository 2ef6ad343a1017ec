//! Club members, used only to prefill the booking form

pub mod model;
pub mod repository;

pub use model::Member;
pub use repository::MemberRepository;

//! Database entities module

pub mod member;
pub mod reservation;
pub mod restaurant_table;
pub mod slot_presence;
pub mod user;
pub mod venue;

pub use member::Entity as Member;
pub use reservation::Entity as Reservation;
pub use restaurant_table::Entity as RestaurantTable;
pub use slot_presence::Entity as SlotPresence;
pub use user::Entity as User;
pub use venue::Entity as Venue;

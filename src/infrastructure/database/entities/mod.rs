//! Database entities module

pub mod admin;
pub mod state_crop;
pub mod user;

pub use admin::Entity as Admin;
pub use state_crop::Entity as StateCrop;
pub use user::Entity as User;

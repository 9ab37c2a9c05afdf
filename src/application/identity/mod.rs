//! User and admin accounts
//!
//! `UserService` covers registration, login and the admin-side user
//! management; `AdminService` covers admin login and provisioning.

pub mod admin_service;
pub mod service;

pub use admin_service::AdminService;
pub use service::UserService;

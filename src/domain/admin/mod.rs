//! Admin accounts
//!
//! Admins are provisioned out-of-band (CLI or configured default) and are
//! only read by the running server.

pub mod model;
pub mod repository;

pub use model::Admin;
pub use repository::AdminRepositoryInterface;

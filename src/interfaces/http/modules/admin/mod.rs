//! Admin login and user management

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;

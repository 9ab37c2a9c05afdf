//! Database repository implementations
//!
//! One SeaORM repository per aggregate.

pub mod admin_repository;
pub mod state_crop_repository;
pub mod user_repository;

pub use admin_repository::AdminRepository;
pub use state_crop_repository::StateCropRepository;
pub use user_repository::UserRepository;

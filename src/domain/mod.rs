//! Domain layer: entities and the ports the application layer depends on.

pub mod admin;
pub mod crop_map;
pub mod prediction;
pub mod user;

pub use admin::{Admin, AdminRepositoryInterface};
pub use crop_map::{CropMapRepositoryInterface, StateCrop};
pub use prediction::{PredictionGateway, PredictionKind};
pub use user::{
    CreateUserDto, GetUserDto, User, UserRepositoryInterface, UserRole, UserStatus,
};

pub use crate::shared::{DomainError, DomainResult};

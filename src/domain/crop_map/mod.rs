//! State → crop reference table

pub mod model;
pub mod repository;

pub use model::StateCrop;
pub use repository::CropMapRepositoryInterface;

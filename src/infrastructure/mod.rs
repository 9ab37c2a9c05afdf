//! Infrastructure layer - external concerns

pub mod database;
pub mod ml;

pub use database::{init_database, DatabaseConfig, Databases};
pub use ml::HttpPredictionGateway;

//! Predictions served by the external ML service

pub mod gateway;
pub mod model;

pub use gateway::PredictionGateway;
pub use model::PredictionKind;

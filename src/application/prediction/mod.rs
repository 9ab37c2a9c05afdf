//! Pass-through proxy to the ML inference service

pub mod service;

pub use service::PredictionService;

//! Client for the external ML inference service

mod client;

pub use client::HttpPredictionGateway;

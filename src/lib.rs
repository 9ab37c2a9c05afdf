//! # Smart Farm Backend
//!
//! REST backend for the Smart Farm app: farmer accounts, admin account
//! management, a state → crop reference lookup and a pass-through proxy to
//! an external ML inference service.
//!
//! ## Architecture
//!
//! - **domain**: entities and the ports the use-cases depend on
//! - **application**: use-case services
//! - **infrastructure**: SeaORM persistence and the ML HTTP client
//! - **interfaces**: axum REST API with Swagger documentation
//! - **server**: runtime wiring and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig, ConfigError};

pub use infrastructure::{init_database, DatabaseConfig, Databases};

pub use interfaces::http::create_api_router;

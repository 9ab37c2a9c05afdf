//! Application layer: use-case services
//!
//! HTTP handlers and the CLI are thin wrappers around these services.

pub mod crop_map;
pub mod identity;
pub mod prediction;

pub use crop_map::{CropMapService, ImportSummary};
pub use identity::{AdminService, UserService};
pub use prediction::PredictionService;

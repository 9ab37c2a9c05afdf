//! State → crop reference lookup and bulk import

pub mod service;

pub use service::{CropMapService, ImportSummary};

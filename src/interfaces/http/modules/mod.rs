pub mod admin;
pub mod crop_map;
pub mod health;
pub mod metrics;
pub mod predictions;
pub mod request_id;
pub mod users;

use chrono::{DateTime, Utc};

#[derive(Clone, Debug)]
pub struct Admin {
    pub id: String,
    pub email: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

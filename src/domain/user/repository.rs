use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{CreateUserDto, GetUserDto, User, UserStatus};
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    /// Insert a new user. A duplicate email yields `DomainError::Conflict`.
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User>;

    async fn list_users(&self, dto: GetUserDto) -> DomainResult<Vec<User>>;
    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    /// First user (oldest) whose username and plaintext password both match.
    async fn find_by_credentials(&self, username: &str, password: &str)
        -> DomainResult<Option<User>>;

    async fn record_login(&self, id: &str, at: DateTime<Utc>) -> DomainResult<User>;
    async fn update_status(&self, id: &str, status: UserStatus) -> DomainResult<Option<User>>;
}

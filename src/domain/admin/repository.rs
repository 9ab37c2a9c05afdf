use async_trait::async_trait;

use super::Admin;
use crate::domain::DomainResult;

#[async_trait]
pub trait AdminRepositoryInterface: Send + Sync {
    async fn find_by_credentials(&self, email: &str, password: &str)
        -> DomainResult<Option<Admin>>;

    /// A duplicate email yields `DomainError::Conflict`.
    async fn create_admin(&self, email: &str, password: &str) -> DomainResult<Admin>;

    async fn count_admins(&self) -> DomainResult<u64>;
}

//! Admin login and provisioning

use std::sync::Arc;

use tracing::info;

use crate::domain::{Admin, AdminRepositoryInterface, DomainError, DomainResult};

pub struct AdminService<R: AdminRepositoryInterface> {
    repo: Arc<R>,
}

impl<R: AdminRepositoryInterface> AdminService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Plaintext credential check against the admin store.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<Admin> {
        let admin = self
            .repo
            .find_by_credentials(email, password)
            .await?
            .ok_or_else(|| DomainError::Unauthorized("Invalid admin credentials".into()))?;

        info!(admin_id = %admin.id, "Admin logged in");
        Ok(admin)
    }

    /// Out-of-band provisioning (CLI, first start).
    pub async fn create_admin(&self, email: &str, password: &str) -> DomainResult<Admin> {
        if !email.contains('@') {
            return Err(DomainError::Validation("Invalid email address".into()));
        }
        if password.is_empty() {
            return Err(DomainError::Validation("Password is required".into()));
        }

        let admin = self.repo.create_admin(email, password).await?;
        info!(admin_id = %admin.id, email = %admin.email, "Admin created");
        Ok(admin)
    }

    /// Create the given admin only when the admin store is empty.
    ///
    /// Returns `true` when an admin was created.
    pub async fn ensure_default_admin(&self, email: &str, password: &str) -> DomainResult<bool> {
        if self.repo.count_admins().await? > 0 {
            return Ok(false);
        }
        self.create_admin(email, password).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::repositories::test_support::memory_db;
    use crate::infrastructure::database::repositories::AdminRepository;

    async fn service() -> AdminService<AdminRepository> {
        AdminService::new(Arc::new(AdminRepository::new(memory_db().await)))
    }

    #[tokio::test]
    async fn login_requires_exact_credentials() {
        let svc = service().await;
        svc.create_admin("admin@gmail.com", "admin123").await.unwrap();

        assert!(svc.login("admin@gmail.com", "admin123").await.is_ok());
        let err = svc.login("admin@gmail.com", "admin").await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::Unauthorized(ref m) if m == "Invalid admin credentials"
        ));
    }

    #[tokio::test]
    async fn default_admin_is_created_once() {
        let svc = service().await;

        assert!(svc.ensure_default_admin("admin@gmail.com", "admin123").await.unwrap());
        assert!(!svc.ensure_default_admin("other@gmail.com", "x").await.unwrap());
        assert!(svc.login("other@gmail.com", "x").await.is_err());
    }

    #[tokio::test]
    async fn create_rejects_bad_input() {
        let svc = service().await;
        assert!(matches!(
            svc.create_admin("not-an-email", "pw").await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            svc.create_admin("a@b.c", "").await,
            Err(DomainError::Validation(_))
        ));
    }
}

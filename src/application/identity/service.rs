//! User accounts: registration, login and admin-side management

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::domain::{
    CreateUserDto, DomainError, DomainResult, GetUserDto, User, UserRepositoryInterface,
    UserStatus,
};

/// Generic over the repository; the server uses the SeaORM one.
pub struct UserService<R: UserRepositoryInterface> {
    repo: Arc<R>,
}

impl<R: UserRepositoryInterface> UserService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    // ── Registration ────────────────────────────────────────────

    /// Register a new user with the default role and `Active` status.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> DomainResult<User> {
        if self.repo.get_user_by_email(email).await?.is_some() {
            return Err(DomainError::Conflict("User already exists".into()));
        }

        let dto = CreateUserDto {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };

        // A concurrent insert trips the unique index; also a Conflict.
        let user = self.repo.create_user(dto).await?;

        info!(user_id = %user.id, username = %user.username, "New user registered");
        Ok(user)
    }

    // ── Authentication ──────────────────────────────────────────

    /// Plaintext credential check. Stamps `last_login` on success.
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<User> {
        let Some(user) = self.repo.find_by_credentials(username, password).await? else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        if !user.is_active() {
            warn!(user_id = %user.id, "Login rejected for inactive account");
            return Err(DomainError::Forbidden("Account is inactive".into()));
        }

        let user = self.repo.record_login(&user.id, Utc::now()).await?;

        info!(user_id = %user.id, username = %user.username, "User logged in");
        Ok(user)
    }

    // ── Admin-side management ───────────────────────────────────

    pub async fn list_users(&self, dto: GetUserDto) -> DomainResult<Vec<User>> {
        self.repo.list_users(dto).await
    }

    /// Activate or deactivate an account.
    pub async fn set_status(&self, id: &str, status: UserStatus) -> DomainResult<User> {
        let user = self
            .repo
            .update_status(id, status)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: id.to_string(),
            })?;

        info!(user_id = %user.id, status = %status, "User status updated");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::repositories::test_support::memory_db;
    use crate::infrastructure::database::repositories::UserRepository;

    async fn service() -> UserService<UserRepository> {
        UserService::new(Arc::new(UserRepository::new(memory_db().await)))
    }

    #[tokio::test]
    async fn second_registration_with_same_email_conflicts() {
        let svc = service().await;
        svc.register("ravi", "ravi@farm.in", "pw").await.unwrap();

        let err = svc
            .register("someone-else", "ravi@farm.in", "other")
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Conflict(ref m) if m == "User already exists"));
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let svc = service().await;
        svc.register("ravi", "ravi@farm.in", "pw").await.unwrap();

        let err = svc.login("ravi", "not-pw").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn inactive_account_is_forbidden_even_with_correct_password() {
        let svc = service().await;
        let user = svc.register("ravi", "ravi@farm.in", "pw").await.unwrap();
        svc.set_status(&user.id, UserStatus::Inactive).await.unwrap();

        let err = svc.login("ravi", "pw").await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(ref m) if m == "Account is inactive"));

        svc.set_status(&user.id, UserStatus::Active).await.unwrap();
        assert!(svc.login("ravi", "pw").await.is_ok());
    }

    #[tokio::test]
    async fn login_stamps_last_login() {
        let svc = service().await;
        svc.register("ravi", "ravi@farm.in", "pw").await.unwrap();

        let user = svc.login("ravi", "pw").await.unwrap();
        assert!(user.last_login.is_some());
    }

    #[tokio::test]
    async fn status_of_unknown_user_is_not_found() {
        let svc = service().await;
        let err = svc.set_status("nope", UserStatus::Active).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "User", .. }));
    }
}

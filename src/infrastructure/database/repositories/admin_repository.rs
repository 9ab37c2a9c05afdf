use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set, SqlErr,
};

use crate::domain::{Admin, AdminRepositoryInterface, DomainError, DomainResult};
use crate::infrastructure::database::entities::admin;

pub struct AdminRepository {
    db: DatabaseConnection,
}

impl AdminRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn admin_model_to_domain(model: admin::Model) -> Admin {
    Admin {
        id: model.id,
        email: model.email,
        password: model.password,
        created_at: model.created_at,
    }
}

#[async_trait]
impl AdminRepositoryInterface for AdminRepository {
    async fn find_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> DomainResult<Option<Admin>> {
        let model = admin::Entity::find()
            .filter(admin::Column::Email.eq(email))
            .filter(admin::Column::Password.eq(password))
            .one(&self.db)
            .await?;

        Ok(model.map(admin_model_to_domain))
    }

    async fn create_admin(&self, email: &str, password: &str) -> DomainResult<Admin> {
        let new_admin = admin::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            email: Set(email.to_string()),
            password: Set(password.to_string()),
            created_at: Set(Utc::now()),
        };

        let model = new_admin.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                DomainError::Conflict(format!("Admin '{}' already exists", email))
            }
            _ => e.into(),
        })?;

        Ok(admin_model_to_domain(model))
    }

    async fn count_admins(&self) -> DomainResult<u64> {
        Ok(admin::Entity::find().count(&self.db).await?)
    }
}

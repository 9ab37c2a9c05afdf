use thiserror::Error;

/// Use-case level failures.
///
/// The `String` payloads are client-facing messages; storage and upstream
/// causes are logged where they occur and only summarized here.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Upstream service error: {0}")]
    Upstream(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    /// Message suitable for the `{message}` body of an error response.
    pub fn client_message(&self) -> String {
        match self {
            DomainError::NotFound { entity, .. } => format!("{} not found", entity),
            DomainError::Validation(msg)
            | DomainError::Conflict(msg)
            | DomainError::Unauthorized(msg)
            | DomainError::Forbidden(msg)
            | DomainError::Upstream(msg)
            | DomainError::Storage(msg) => msg.clone(),
        }
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Storage(format!("Database error: {}", e))
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity_only() {
        let err = DomainError::NotFound {
            entity: "User",
            field: "id",
            value: "abc".into(),
        };
        assert_eq!(err.client_message(), "User not found");
        assert_eq!(err.to_string(), "Not found: User with id=abc");
    }

    #[test]
    fn db_errors_become_storage_errors() {
        let err: DomainError = sea_orm::DbErr::Custom("boom".into()).into();
        assert!(matches!(err, DomainError::Storage(ref m) if m.contains("boom")));
    }
}

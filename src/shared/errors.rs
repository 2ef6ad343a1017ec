use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    /// An active reservation already holds the slot.
    #[error("Slot already booked: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The backing store was unavailable or rejected the operation.
    #[error("Store error: {0}")]
    Store(String),

    #[error("Not configured: {0}")]
    Configuration(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.into(),
        }
    }

    /// Whether this error is likely transient (e.g. DB connection lost)
    /// and the operation may succeed if retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::Store(_))
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl From<InfraError> for DomainError {
    fn from(e: InfraError) -> Self {
        DomainError::Store(e.to_string())
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_store_errors_are_transient() {
        assert!(DomainError::Store("connection reset".into()).is_transient());
        assert!(!DomainError::Conflict("T1".into()).is_transient());
        assert!(!DomainError::Validation("guest_count".into()).is_transient());
    }

    #[test]
    fn infra_errors_surface_as_store_errors() {
        let db = sea_orm::DbErr::Custom("disk I/O error".into());
        let err: DomainError = InfraError::Database(db).into();
        assert!(matches!(err, DomainError::Store(ref m) if m.contains("disk I/O error")));
    }

    #[test]
    fn not_found_message_names_entity() {
        let err = DomainError::not_found("Venue", "id", "v-1");
        assert_eq!(err.to_string(), "Not found: Venue with id=v-1");
    }
}

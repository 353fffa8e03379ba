//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

/// Domain errors - business logic failures.
///
/// `NotFound` deliberately covers both "no such record" and "record exists but
/// is hidden from this actor": callers must not be able to tell them apart.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity}")]
    NotFound { entity: &'static str },

    /// Actor is authenticated but is not the author of the resource.
    /// Carries the parent post id so the boundary can redirect to its
    /// public detail view instead of surfacing a bare error page.
    #[error("Permission denied for post {post_id}")]
    PermissionDenied { post_id: Uuid },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => DomainError::NotFound { entity: "record" },
            RepoError::Constraint(msg) => DomainError::Duplicate(msg),
            RepoError::Connection(msg) | RepoError::Query(msg) => DomainError::Internal(msg),
        }
    }
}

//! Error handling - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header};
use blogicum_shared::ErrorResponse;
use std::fmt;
use uuid::Uuid;

/// Application-level error type that converts to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized,
    /// Authenticated non-author on a mutating path. Answered with a redirect
    /// to the parent post's public detail view, not an error page.
    RedirectToPost(Uuid),
    Conflict(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized => write!(f, "Unauthorized"),
            AppError::RedirectToPost(post_id) => write!(f, "Redirect to post {}", post_id),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::RedirectToPost(_) => StatusCode::SEE_OTHER,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::RedirectToPost(post_id) => HttpResponse::SeeOther()
                .insert_header((header::LOCATION, format!("/api/posts/{post_id}")))
                .finish(),
            AppError::NotFound(detail) => {
                HttpResponse::NotFound().json(ErrorResponse::not_found(detail))
            }
            AppError::BadRequest(detail) => {
                HttpResponse::BadRequest().json(ErrorResponse::bad_request(detail))
            }
            AppError::Unauthorized => {
                HttpResponse::Unauthorized().json(ErrorResponse::unauthorized())
            }
            AppError::Conflict(detail) => HttpResponse::Conflict()
                .json(ErrorResponse::new(409, "Conflict").with_detail(detail)),
            AppError::Internal(detail) => {
                // Details stay in the logs; the body is opaque.
                tracing::error!("Internal error: {}", detail);
                HttpResponse::InternalServerError().json(ErrorResponse::internal_error())
            }
        }
    }
}

// Conversion from domain errors
impl From<blogicum_core::error::DomainError> for AppError {
    fn from(err: blogicum_core::error::DomainError) -> Self {
        use blogicum_core::error::DomainError;
        match err {
            DomainError::NotFound { entity } => AppError::NotFound(format!("{entity} not found")),
            DomainError::PermissionDenied { post_id } => AppError::RedirectToPost(post_id),
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<blogicum_core::error::RepoError> for AppError {
    fn from(err: blogicum_core::error::RepoError) -> Self {
        use blogicum_core::error::RepoError;
        match err {
            RepoError::NotFound => AppError::NotFound("resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) | RepoError::Query(msg) => {
                tracing::error!("Database error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

//! Error handling middleware - RFC 7807 compliant responses.

use std::fmt;
use std::time::Duration;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use diner_core::{FieldError, RepoError};
use diner_shared::{ErrorResponse, ValidationFailure};

/// Application-level error type that converts to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    Internal(String),
    /// Input rejected field by field.
    Validation(Vec<FieldError>),
    RateLimited {
        message: String,
        retry_after: Duration,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::Validation(errors) => write!(f, "Validation errors: {:?}", errors),
            AppError::RateLimited { message, .. } => write!(f, "Rate limited: {}", message),
        }
    }
}

impl AppError {
    /// Single-field validation failure.
    pub fn field(field: &str, message: &str) -> Self {
        AppError::Validation(vec![FieldError::new(field, message)])
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        match self {
            AppError::Validation(errors) => builder.json(ValidationFailure::new(errors.clone())),
            AppError::NotFound(detail) => builder.json(ErrorResponse::not_found(detail)),
            AppError::BadRequest(detail) => builder.json(ErrorResponse::bad_request(detail)),
            AppError::Conflict(detail) => builder.json(ErrorResponse::conflict(detail)),
            AppError::Internal(detail) => {
                // Log internal errors
                tracing::error!("Internal error: {}", detail);
                builder.json(ErrorResponse::internal_error())
            }
            AppError::RateLimited {
                message,
                retry_after,
            } => builder
                .insert_header(("Retry-After", retry_after.as_secs().max(1).to_string()))
                .insert_header(("X-RateLimit-Remaining", "0"))
                .json(ErrorResponse::too_many_requests(message)),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

/// Map a store miss to a 404 naming what was looked up.
pub fn not_found(what: &'static str) -> impl FnOnce(RepoError) -> AppError {
    move |err| match err {
        RepoError::NotFound => AppError::NotFound(format!("{what} not found")),
        other => other.into(),
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

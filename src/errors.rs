// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for the claim verification service

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Every fallible operation around the matcher returns this enum
/// Each variant maps to an HTTP status code and a stable error code
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Forbidden access")]
    Forbidden,

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

impl DirectoryError {
    /// Stable machine-readable code used in the JSON error body
    pub fn code(&self) -> &'static str {
        match self {
            DirectoryError::NotFound(_) => "NOT_FOUND",
            DirectoryError::DatabaseError(_) => "DATABASE_ERROR",
            DirectoryError::InvalidInput(_) => "INVALID_INPUT",
            DirectoryError::ValidationError(_) => "VALIDATION_ERROR",
            DirectoryError::Unauthorized => "UNAUTHORIZED",
            DirectoryError::Forbidden => "FORBIDDEN",
            DirectoryError::ExternalApiError(_) => "EXTERNAL_API_ERROR",
            DirectoryError::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
        }
    }
}

impl From<sqlx::Error> for DirectoryError {
    fn from(e: sqlx::Error) -> Self {
        DirectoryError::DatabaseError(e.to_string())
    }
}

impl From<validator::ValidationErrors> for DirectoryError {
    fn from(e: validator::ValidationErrors) -> Self {
        DirectoryError::ValidationError(e.to_string())
    }
}

/// Convert DirectoryError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for DirectoryError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            DirectoryError::NotFound(_) => StatusCode::NOT_FOUND,
            DirectoryError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DirectoryError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            DirectoryError::ValidationError(_) => StatusCode::BAD_REQUEST,
            DirectoryError::Unauthorized => StatusCode::UNAUTHORIZED,
            DirectoryError::Forbidden => StatusCode::FORBIDDEN,
            DirectoryError::ExternalApiError(_) => StatusCode::BAD_GATEWAY,
            DirectoryError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

//! Domain error types for the test report collector.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use actix_web::{HttpResponse, ResponseError};
use std::fmt;

use crate::models::ParamError;

/// Report decoding errors.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// No decoder is registered for the requested format
    #[error("invalid report type: {0}")]
    UnsupportedFormat(String),

    /// Input does not parse as the expected document
    #[error("unmarshalling to junit failed: {0}")]
    Malformed(String),

    /// Reading the input failed
    #[error("unable to read report: {0}")]
    Read(#[from] std::io::Error),
}

/// Storage errors raised while persisting an aggregate.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Non-database backend failure
    #[error("Storage error: {0}")]
    Backend(String),

    /// The store returned the wrong number of identities
    #[error("Storage returned {returned} identities for {expected} scenarios")]
    IdentityMismatch { expected: usize, returned: usize },

    /// A scenario result reached the store without its scenario identity
    #[error("Scenario result {0:?} has no scenario identity")]
    MissingIdentity(String),
}

/// Errors of one ingestion run, keeping the underlying cause.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Save(#[from] SaveError),
}

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Invalid input data
    #[error("{0}")]
    InvalidInput(String),

    /// Uploaded payload exceeds the configured limit
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// HTTP method not allowed on this route
    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status, error_code, response_message) = match self {
            AppError::Database(err_str) => {
                tracing::error!("Database error: {}", err_str);
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "unable to process the request".to_string(),
                )
            }
            AppError::InvalidInput(_) => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "INVALID_INPUT",
                self.to_string(),
            ),
            AppError::PayloadTooLarge(_) => (
                actix_web::http::StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                self.to_string(),
            ),
            AppError::MethodNotAllowed => (
                actix_web::http::StatusCode::METHOD_NOT_ALLOWED,
                "METHOD_NOT_ALLOWED",
                self.to_string(),
            ),
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: error_code.to_string(),
            message: response_message,
        })
    }
}

/// Error response body matching OpenAPI schema.
#[derive(Debug, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

// Conversion implementations for common error types

impl From<ParamError> for AppError {
    fn from(err: ParamError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Report(e) => AppError::InvalidInput(e.to_string()),
            IngestError::Save(e) => AppError::Database(e.to_string()),
        }
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::Database(err.to_string())
    }
}

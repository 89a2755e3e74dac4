//! Error types for Bookshelf server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error codes exposed in JSON error bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthorized = 2,
    DbFailure = 3,
    NoSuchUser = 4,
    NoSuchBook = 5,
    Duplicate = 6,
    BadValue = 7,
    InvalidIsbn = 8,
    OpacUnavailable = 9,
    OpacUnparseable = 10,
    IncompleteMetadata = 11,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Primary-key race on insert. The acquisition pipeline resolves this
    /// internally by re-reading; it only surfaces for manual creation.
    #[error("Duplicate key: {0}")]
    Duplicate(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    /// Malformed or checksum-failed ISBN supplied by the caller.
    #[error("Invalid ISBN: {0}")]
    InvalidIsbn(String),

    /// The external OPAC could not be reached: network failure, timeout,
    /// non-2xx status, or session discovery failure.
    #[error("OPAC source unavailable: {0}")]
    SourceUnavailable(String),

    /// The OPAC answered but its markup did not match the expected
    /// structure. Retrying will not help.
    #[error("Unparseable OPAC response: {0}")]
    UnparseableResponse(String),

    /// The OPAC record was parsed but lacks the required fields.
    #[error("Incomplete metadata: {0}")]
    IncompleteMetadata(String),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Authentication(msg) => {
                (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthorized, msg.clone())
            }
            AppError::Authorization(msg) => {
                (StatusCode::FORBIDDEN, ErrorCode::NotAuthorized, msg.clone())
            }
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchBook, msg.clone())
            }
            AppError::UserNotFound(msg) => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchUser, msg.clone())
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::Conflict(msg) | AppError::Duplicate(msg) => {
                (StatusCode::CONFLICT, ErrorCode::Duplicate, msg.clone())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
            AppError::InvalidIsbn(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidIsbn, msg.clone())
            }
            AppError::SourceUnavailable(msg) => {
                (StatusCode::BAD_GATEWAY, ErrorCode::OpacUnavailable, msg.clone())
            }
            AppError::UnparseableResponse(msg) => {
                (StatusCode::BAD_GATEWAY, ErrorCode::OpacUnparseable, msg.clone())
            }
            AppError::IncompleteMetadata(msg) => {
                (StatusCode::NOT_FOUND, ErrorCode::IncompleteMetadata, msg.clone())
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

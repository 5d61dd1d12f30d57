//! Error types for the Bookrent services

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::services::rents::{Reconciliation, RentError};

/// Stable error codes returned in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthorized = 2,
    DbFailure = 3,
    NoSuchData = 4,
    Duplicate = 5,
    BadValue = 6,
    TransactionServiceFailure = 7,
    RentFailed = 8,
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

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Downstream service error: {0}")]
    Downstream(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Rent failed: {0}")]
    Rent(#[from] RentError),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    /// Side effects left behind by a failed rent request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reconciliation: Option<Reconciliation>,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::Authentication(_) => (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthorized),
            AppError::Authorization(_) => (StatusCode::FORBIDDEN, ErrorCode::NotAuthorized),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchData),
            AppError::Validation(_) | AppError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue)
            }
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DbFailure),
            AppError::Conflict(_) => (StatusCode::CONFLICT, ErrorCode::Duplicate),
            AppError::Downstream(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::TransactionServiceFailure,
            ),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Failure),
            AppError::Rent(rent) => match rent {
                RentError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue),
                RentError::HistoryWrite(inner) => inner.status_and_code(),
                RentError::UserNotFound(_) | RentError::BookNotFound(_) => {
                    (StatusCode::NOT_FOUND, ErrorCode::RentFailed)
                }
                RentError::Lookup(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DbFailure),
                RentError::TransactionCreate(_)
                | RentError::ItemsRolledBack { .. }
                | RentError::CompensationFailed { .. }
                | RentError::TransactionTask(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::TransactionServiceFailure,
                ),
            },
        }
    }

    /// Message safe to show to clients
    fn public_message(&self) -> String {
        match self {
            AppError::Authentication(msg)
            | AppError::Authorization(msg)
            | AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Conflict(msg)
            | AppError::BadRequest(msg) => msg.clone(),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::Downstream(msg) => {
                tracing::error!("Downstream error: {}", msg);
                "Transaction service error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            AppError::Rent(rent) => match rent {
                RentError::HistoryWrite(inner) => inner.public_message(),
                RentError::Validation(msg) => msg.clone(),
                RentError::UserNotFound(id) => format!("User with id {} not found", id),
                RentError::BookNotFound(id) => format!("Book with id {} not found", id),
                RentError::Lookup(_) => "Database error".to_string(),
                RentError::TransactionCreate(_) => "Transaction service error".to_string(),
                RentError::ItemsRolledBack { transaction_id, .. } => format!(
                    "Transaction {} could not be completed and was rolled back",
                    transaction_id
                ),
                RentError::CompensationFailed { transaction_id, .. } => format!(
                    "Transaction {} could not be completed nor rolled back",
                    transaction_id
                ),
                RentError::TransactionTask(_) => "Transaction service error".to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let reconciliation = match &self {
            AppError::Rent(rent) => Some(rent.reconciliation()),
            _ => None,
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message: self.public_message(),
            reconciliation,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

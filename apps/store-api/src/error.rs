//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Store API                          │
//! │                                                                         │
//! │  Handler → Result<_, ApiError>                                          │
//! │         │                                                               │
//! │         ├── DbError         ─┐                                          │
//! │         ├── ValidationError ─┼──► ApiError { status, code, message }   │
//! │         ├── CheckoutError   ─┤           │                              │
//! │         └── bad path / body ─┘           ▼                              │
//! │                                  IntoResponse                           │
//! │                                                                         │
//! │  {"status":"FAIL","message":"product id 7 is out of stock: ...",       │
//! │   "code":"INSUFFICIENT_STOCK"}                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Infrastructure failures are logged in full and reach the client only as
//! a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use store_core::{CheckoutError, ValidationError};
use store_db::DbError;

use crate::response::ApiResponse;

/// API error returned from handlers.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status
    pub status: StatusCode,

    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Path id is not an integer (400)
    InvalidId,

    /// Body is not valid JSON for the endpoint (400)
    InvalidRequestBody,

    /// Input validation failed (400)
    ValidationError,

    /// Resource conflicts with existing data (409)
    Conflict,

    /// Checkout referenced an unknown product (404)
    ProductNotFound,

    /// Checkout asked for more than is in stock (409)
    InsufficientStock,

    /// Checkout line quantity was not positive (400)
    InvalidQuantity,

    /// Checkout amount does not fit (422)
    AmountOverflow,

    /// HTTP method not supported on this path (405)
    MethodNotAllowed,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str) -> Self {
        ApiError::new(
            StatusCode::NOT_FOUND,
            ErrorCode::NotFound,
            format!("{} not found", resource),
        )
    }

    pub fn invalid_id() -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, ErrorCode::InvalidId, "Invalid ID")
    }

    pub fn invalid_body() -> Self {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidRequestBody,
            "Invalid request body",
        )
    }

    pub fn method_not_allowed() -> Self {
        ApiError::new(
            StatusCode::METHOD_NOT_ALLOWED,
            ErrorCode::MethodNotAllowed,
            "Method not allowed",
        )
    }

    fn database(message: &str) -> Self {
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::DatabaseError,
            message,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()>::fail(self.message, self.code);
        (self.status, Json(body)).into_response()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, .. } => ApiError::not_found(&entity),
            DbError::ForeignKeyViolation { message } => {
                tracing::warn!(%message, "Foreign key violation");
                ApiError::new(
                    StatusCode::CONFLICT,
                    ErrorCode::Conflict,
                    "Resource is referenced by existing transactions",
                )
            }
            DbError::CheckViolation { message } => {
                tracing::warn!(%message, "Check constraint violation");
                ApiError::new(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::ValidationError,
                    "Value out of range",
                )
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!(error = %e, "Database connection failed");
                ApiError::database("Database connection failed")
            }
            DbError::PoolExhausted => {
                tracing::error!("Database pool exhausted");
                ApiError::database("Database is busy")
            }
            other => {
                tracing::error!(error = %other, "Database operation failed");
                ApiError::database("Database operation failed")
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            ErrorCode::ValidationError,
            err.to_string(),
        )
    }
}

/// Converts checkout outcomes to API errors.
///
/// ## Mapping
/// ```text
/// ProductNotFound   → 404 PRODUCT_NOT_FOUND
/// InsufficientStock → 409 INSUFFICIENT_STOCK
/// InvalidQuantity   → 400 INVALID_QUANTITY
/// AmountOverflow    → 422 AMOUNT_OVERFLOW
/// Persistence       → 500 INTERNAL (details logged only)
/// ```
impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        let message = err.to_string();
        match err {
            CheckoutError::ProductNotFound(_) => {
                ApiError::new(StatusCode::NOT_FOUND, ErrorCode::ProductNotFound, message)
            }
            CheckoutError::InsufficientStock { .. } => {
                ApiError::new(StatusCode::CONFLICT, ErrorCode::InsufficientStock, message)
            }
            CheckoutError::InvalidQuantity { .. } => {
                ApiError::new(StatusCode::BAD_REQUEST, ErrorCode::InvalidQuantity, message)
            }
            CheckoutError::AmountOverflow { .. } => ApiError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::AmountOverflow,
                message,
            ),
            CheckoutError::Persistence(e) => {
                tracing::error!(error = %e, "Checkout persistence failure");
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Internal,
                    "Checkout failed, please retry",
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store_core::PersistenceError;

    #[test]
    fn test_checkout_error_mapping() {
        let err: ApiError = CheckoutError::InsufficientStock {
            product_id: 1,
            available: 2,
            requested: 3,
        }
        .into();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        let err: ApiError = CheckoutError::ProductNotFound(999).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "product id 999 not found");
    }

    #[test]
    fn test_persistence_detail_not_leaked() {
        let source = DbError::QueryFailed("disk I/O error at /secret/path".into());
        let err: ApiError = CheckoutError::Persistence(PersistenceError::from(source)).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("secret"));
    }

    #[test]
    fn test_db_error_mapping() {
        let err: ApiError = DbError::not_found("Product", 5).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Product not found");

        let err: ApiError = DbError::ForeignKeyViolation {
            message: "FOREIGN KEY constraint failed".into(),
        }
        .into();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }
}

//! Liveness endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::{ApiError, ErrorCode};
use crate::response::ApiResponse;
use crate::AppState;

/// `GET /health`: `{"status":"OK","message":"Server is running"}` while the
/// database answers, 503 otherwise.
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    if state.db.health_check().await {
        ApiResponse::ok_empty("Server is running").into_response()
    } else {
        tracing::warn!("Health check failed: database unavailable");
        ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::DatabaseError,
            "Database unavailable",
        )
        .into_response()
    }
}

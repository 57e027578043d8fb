//! JSON envelope shared by every endpoint.
//!
//! ```json
//! {"status": "OK", "message": "Product retrieved", "data": {...}}
//! {"status": "FAIL", "message": "Invalid ID", "code": "INVALID_ID"}
//! ```

use axum::Json;
use serde::Serialize;

use crate::error::ErrorCode;

pub const STATUS_OK: &str = "OK";
pub const STATUS_FAIL: &str = "FAIL";

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Json<Self> {
        Json(ApiResponse {
            status: STATUS_OK,
            message: message.into(),
            data: Some(data),
            code: None,
        })
    }

    pub fn fail(message: impl Into<String>, code: ErrorCode) -> Self {
        ApiResponse {
            status: STATUS_FAIL,
            message: message.into(),
            data: None,
            code: Some(code),
        }
    }
}

impl ApiResponse<()> {
    /// Success with no payload.
    pub fn ok_empty(message: impl Into<String>) -> Json<Self> {
        Json(ApiResponse {
            status: STATUS_OK,
            message: message.into(),
            data: None,
            code: None,
        })
    }
}

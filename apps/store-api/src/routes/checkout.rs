//! `/api/checkout` and `/api/transactions` handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;

use store_core::{CheckoutRequest, Transaction};

use super::{json_body, parse_id};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::AppState;

/// `POST /api/checkout` with `{"items":[{"product_id":1,"quantity":2}]}`.
///
/// All-or-nothing: on any error no stock moves and no transaction exists.
pub async fn checkout(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Transaction>>, ApiError> {
    let request = json_body(payload)?;
    let transaction = state.checkout.checkout(&request.items).await?;
    Ok(ApiResponse::ok("Checkout success", transaction))
}

pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<Transaction>>, ApiError> {
    let id = parse_id(&raw_id)?;
    let transaction = state
        .db
        .transactions()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Transaction"))?;
    Ok(ApiResponse::ok("Transaction retrieved", transaction))
}

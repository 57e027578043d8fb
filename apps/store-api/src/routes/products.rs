//! `/api/products` handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use store_core::validation::{validate_product_input, validate_search_query};
use store_core::{Product, ProductInput};

use super::{json_body, parse_id, ListParams};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::AppState;

type ProductResponse = Json<ApiResponse<Product>>;

/// `GET /api/products?name=kopi`
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiResponse<Vec<Product>>>, ApiError> {
    let filter = params
        .name
        .as_deref()
        .map(validate_search_query)
        .transpose()?;
    let products = state.db.products().list(filter.as_deref()).await?;
    Ok(ApiResponse::ok("Products retrieved", products))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<(StatusCode, ProductResponse), ApiError> {
    let input = json_body(payload)?;
    validate_product_input(&input)?;

    let product = state.db.products().insert(&input).await?;
    info!(
        id = product.id,
        name = %product.name,
        price = product.price.cents(),
        stock = product.stock,
        "Product created"
    );

    Ok((StatusCode::CREATED, ApiResponse::ok("Product created", product)))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<ProductResponse, ApiError> {
    let id = parse_id(&raw_id)?;
    let product = state
        .db
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product"))?;
    Ok(ApiResponse::ok("Product retrieved", product))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<ProductResponse, ApiError> {
    let id = parse_id(&raw_id)?;
    let input = json_body(payload)?;
    validate_product_input(&input)?;

    let product = state.db.products().update(id, &input).await?;
    info!(id, "Product updated");

    Ok(ApiResponse::ok("Product updated", product))
}

/// Products referenced by past transactions cannot be deleted (409).
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = parse_id(&raw_id)?;
    state.db.products().delete(id).await?;
    info!(id, "Product deleted");

    Ok(ApiResponse::ok_empty("Product deleted"))
}

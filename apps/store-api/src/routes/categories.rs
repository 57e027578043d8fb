//! `/api/categories` handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use store_core::validation::{validate_category_input, validate_search_query};
use store_core::{Category, CategoryInput};

use super::{json_body, parse_id, ListParams};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::AppState;

type CategoryResponse = Json<ApiResponse<Category>>;

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiResponse<Vec<Category>>>, ApiError> {
    let filter = params
        .name
        .as_deref()
        .map(validate_search_query)
        .transpose()?;
    let categories = state.db.categories().list(filter.as_deref()).await?;
    Ok(ApiResponse::ok("Categories retrieved", categories))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CategoryInput>, JsonRejection>,
) -> Result<(StatusCode, CategoryResponse), ApiError> {
    let input = json_body(payload)?;
    validate_category_input(&input)?;

    let category = state.db.categories().insert(&input).await?;
    info!(id = category.id, name = %category.name, "Category created");

    Ok((StatusCode::CREATED, ApiResponse::ok("Category created", category)))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<CategoryResponse, ApiError> {
    let id = parse_id(&raw_id)?;
    let category = state
        .db
        .categories()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category"))?;
    Ok(ApiResponse::ok("Category retrieved", category))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    payload: Result<Json<CategoryInput>, JsonRejection>,
) -> Result<CategoryResponse, ApiError> {
    let id = parse_id(&raw_id)?;
    let input = json_body(payload)?;
    validate_category_input(&input)?;

    let category = state.db.categories().update(id, &input).await?;
    info!(id, "Category updated");

    Ok(ApiResponse::ok("Category updated", category))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = parse_id(&raw_id)?;
    state.db.categories().delete(id).await?;
    info!(id, "Category deleted");

    Ok(ApiResponse::ok_empty("Category deleted"))
}

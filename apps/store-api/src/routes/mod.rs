//! HTTP routes.
//!
//! ```text
//! GET    /health
//! GET    /api/categories[?name=]      POST /api/categories
//! GET    /api/categories/{id}         PUT  /api/categories/{id}   DELETE /api/categories/{id}
//! GET    /api/products[?name=]        POST /api/products
//! GET    /api/products/{id}           PUT  /api/products/{id}     DELETE /api/products/{id}
//! POST   /api/checkout
//! GET    /api/transactions/{id}
//! ```
//!
//! Any other method on a known path answers 405, any other path 404, both
//! in the usual `{"status":"FAIL",...}` envelope.

mod categories;
mod checkout;
mod health;
mod products;

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::ApiError;
use crate::AppState;

/// Builds the application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health).fallback(method_not_allowed))
        .route(
            "/api/categories",
            get(categories::list)
                .post(categories::create)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/categories/{id}",
            get(categories::get)
                .put(categories::update)
                .delete(categories::delete)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/products",
            get(products::list)
                .post(products::create)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/products/{id}",
            get(products::get)
                .put(products::update)
                .delete(products::delete)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/checkout",
            post(checkout::checkout).fallback(method_not_allowed),
        )
        .route(
            "/api/transactions/{id}",
            get(checkout::get_transaction).fallback(method_not_allowed),
        )
        .fallback(route_not_found)
        .with_state(state)
}

async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

async fn route_not_found() -> ApiError {
    ApiError::not_found("Route")
}

/// `?name=` filter shared by the list endpoints.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListParams {
    pub name: Option<String>,
}

/// Parses a path id; anything but an integer is `400 Invalid ID`.
pub(crate) fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim().parse::<i64>().map_err(|_| ApiError::invalid_id())
}

/// Unwraps a JSON body, turning every rejection into `400 Invalid request body`.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected request body");
            Err(ApiError::invalid_body())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use store_db::{Database, DbConfig};
    use tower::ServiceExt;

    async fn test_app() -> Router {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        build_router(AppState::new(db))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn create_product(app: &Router, name: &str, price: i64, stock: i64) -> i64 {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/products",
            Some(json!({"name": name, "price": price, "stock": stock})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app().await;
        let (status, body) = send(&app, Method::GET, "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "OK", "message": "Server is running"}));
    }

    #[tokio::test]
    async fn test_category_crud() {
        let app = test_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/categories",
            Some(json!({"name": "Animal", "description": "Living things that move"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "OK");
        assert_eq!(body["message"], "Category created");
        let id = body["data"]["id"].as_i64().unwrap();

        let (status, body) = send(&app, Method::GET, &format!("/api/categories/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "Animal");

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/api/categories/{id}"),
            Some(json!({"name": "Plant"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "Plant");
        assert_eq!(body["data"]["description"], "");

        let (status, body) = send(&app, Method::GET, "/api/categories?name=pla", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, body) =
            send(&app, Method::DELETE, &format!("/api/categories/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Category deleted");
        assert!(body.get("data").is_none());

        let (status, body) = send(&app, Method::GET, &format!("/api/categories/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "FAIL");
        assert_eq!(body["message"], "Category not found");
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_invalid_id_and_body() {
        let app = test_app().await;

        let (status, body) = send(&app, Method::GET, "/api/products/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid ID");
        assert_eq!(body["code"], "INVALID_ID");

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/products")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Invalid request body");

        // Missing field
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/products",
            Some(json!({"name": "Kopi"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_REQUEST_BODY");
    }

    #[tokio::test]
    async fn test_product_validation() {
        let app = test_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/products",
            Some(json!({"name": "   ", "price": 100, "stock": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/products",
            Some(json!({"name": "Kopi", "price": -1, "stock": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/products/42",
            Some(json!({"name": "Kopi", "price": 100, "stock": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_checkout_success() {
        let app = test_app().await;
        let a = create_product(&app, "Product A", 15_000, 10).await;
        let b = create_product(&app, "Product B", 5_000, 5).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/checkout",
            Some(json!({"items": [
                {"product_id": a, "quantity": 2},
                {"product_id": b, "quantity": 3}
            ]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Checkout success");
        assert_eq!(body["data"]["total_amount"], 45_000);

        let details = body["data"]["details"].as_array().unwrap();
        assert_eq!(details.len(), 2);
        assert_eq!(details[0]["product_name"], "Product A");
        assert_eq!(details[0]["subtotal"], 30_000);
        assert_eq!(details[1]["subtotal"], 15_000);

        let (_, product) = send(&app, Method::GET, &format!("/api/products/{a}"), None).await;
        assert_eq!(product["data"]["stock"], 8);
        let (_, product) = send(&app, Method::GET, &format!("/api/products/{b}"), None).await;
        assert_eq!(product["data"]["stock"], 2);

        let id = body["data"]["id"].as_i64().unwrap();
        let (status, stored) =
            send(&app, Method::GET, &format!("/api/transactions/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stored["message"], "Transaction retrieved");
        assert_eq!(stored["data"]["id"], body["data"]["id"]);
        assert_eq!(stored["data"]["total_amount"], 45_000);
        assert_eq!(stored["data"]["details"], body["data"]["details"]);
    }

    #[tokio::test]
    async fn test_checkout_failures_leave_stock() {
        let app = test_app().await;
        let a = create_product(&app, "Product A", 15_000, 10).await;
        let b = create_product(&app, "Product B", 5_000, 5).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/checkout",
            Some(json!({"items": [
                {"product_id": a, "quantity": 2},
                {"product_id": b, "quantity": 6}
            ]})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["status"], "FAIL");
        assert_eq!(body["code"], "INSUFFICIENT_STOCK");

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/checkout",
            Some(json!({"items": [
                {"product_id": a, "quantity": 1},
                {"product_id": 999, "quantity": 1}
            ]})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "PRODUCT_NOT_FOUND");

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/checkout",
            Some(json!({"items": [{"product_id": a, "quantity": 0}]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_QUANTITY");

        let (_, product) = send(&app, Method::GET, &format!("/api/products/{a}"), None).await;
        assert_eq!(product["data"]["stock"], 10);
        let (_, product) = send(&app, Method::GET, &format!("/api/products/{b}"), None).await;
        assert_eq!(product["data"]["stock"], 5);

        let (status, _) = send(&app, Method::GET, "/api/transactions/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_product_with_history_cannot_be_deleted() {
        let app = test_app().await;
        let a = create_product(&app, "Product A", 100, 3).await;

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/checkout",
            Some(json!({"items": [{"product_id": a, "quantity": 1}]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, Method::DELETE, &format!("/api/products/{a}"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_method_not_allowed_and_unknown_route() {
        let app = test_app().await;

        let (status, body) = send(&app, Method::GET, "/api/checkout", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["status"], "FAIL");
        assert_eq!(body["code"], "METHOD_NOT_ALLOWED");

        let (status, _) = send(&app, Method::PATCH, "/api/products/1", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

        let (status, body) = send(&app, Method::GET, "/api/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }
}

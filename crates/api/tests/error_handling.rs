//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server or
//! database is involved.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use stockroom_api::error::AppError;
use stockroom_core::error::{CoreError, FieldError};
use stockroom_core::types::ItemId;
use stockroom_db::repositories::ItemWriteError;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Test: CoreError::NotFound maps to 404 with NOT_FOUND code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let id = ItemId::nil();
    let err = AppError::Core(CoreError::NotFound { entity: "Item", id });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["message"], format!("Item with id {id} not found"));
    assert_eq!(json["error"], json["message"]);
}

// ---------------------------------------------------------------------------
// Test: CoreError::InvalidFields maps to 400 and lists every field
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_fields_return_400_with_errors_array() {
    let err = AppError::Core(CoreError::InvalidFields(vec![
        FieldError::new("name", "Name is required"),
        FieldError::new("quantity", "Quantity cannot be negative"),
    ]));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["message"], "Validation failed");
    assert_eq!(
        json["errors"],
        serde_json::json!([
            {"field": "name", "message": "Name is required"},
            {"field": "quantity", "message": "Quantity cannot be negative"},
        ])
    );
}

// ---------------------------------------------------------------------------
// Test: duplicate SKU surfaces as a field error on `sku`
// ---------------------------------------------------------------------------

#[tokio::test]
async fn duplicate_sku_returns_400_on_sku_field() {
    let err = AppError::from(ItemWriteError::DuplicateSku("CB-100".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["errors"][0]["field"], "sku");
    assert_eq!(json["errors"][0]["message"], "SKU already exists");
}

// ---------------------------------------------------------------------------
// Test: AppError::BadRequest maps to 400 with BAD_REQUEST code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("invalid field value".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["message"], "invalid field value");
    assert!(json.get("errors").is_none());
}

// ---------------------------------------------------------------------------
// Test: database errors map to 500 and sanitize the message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn database_error_returns_500_and_sanitizes_message() {
    let err = AppError::Database(sqlx::Error::PoolTimedOut);

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["message"], "An internal error occurred");
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let err = AppError::Database(sqlx::Error::RowNotFound);

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

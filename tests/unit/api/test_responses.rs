// Unit tests for the error envelope and response shapes

use axum::http::StatusCode;
use axum::response::IntoResponse;
use calendar_backend::api::responses::*;
use calendar_backend::core::errors::{ServiceError, TokenError};
use serde_json::Value;

async fn body_json(error: ApiError) -> (StatusCode, Value) {
    let response = error.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_validation_error_envelope() {
    let error: ApiError = ServiceError::Validation("Calendar name is required".to_string()).into();
    let (status, body) = body_json(error).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Calendar name is required");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_forbidden_carries_reason() {
    let error: ApiError = ServiceError::Forbidden(TokenError::ExpiredToken).into();
    let (status, body) = body_json(error).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Invalid token");
    assert_eq!(body["details"], "jwt expired");
}

#[tokio::test]
async fn test_server_errors_are_generic() {
    let error: ApiError =
        ServiceError::StorageError("duplicate key value violates unique constraint".to_string())
            .into();
    let (status, body) = body_json(error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Server error");
    assert!(!body.to_string().contains("duplicate"));
}

#[tokio::test]
async fn test_conflict_and_not_found_statuses() {
    let (status, _) = body_json(ServiceError::Conflict("taken".to_string()).into()).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = body_json(ServiceError::NotFound("Event not found".to_string()).into()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Event not found");
}

#[tokio::test]
async fn test_with_details() {
    let error = ApiError::with_details(
        StatusCode::BAD_REQUEST,
        "Invalid request body".to_string(),
        "expected value at line 1".to_string(),
    );
    let (_, body) = body_json(error).await;

    assert_eq!(body["details"], "expected value at line 1");
}

#[test]
fn test_message_response_shape() {
    let value = serde_json::to_value(MessageResponse::new("Calendar deleted successfully")).unwrap();
    assert_eq!(value, serde_json::json!({ "message": "Calendar deleted successfully" }));
}

// Integration tests for signup and login

use axum::http::StatusCode;
use calendar_backend::state::UserStore;
use serde_json::json;

use crate::common::*;

#[tokio::test]
async fn test_signup_creates_user() {
    let app = create_test_app();

    let (status, body) = signup(&app, "alice", "hunter22").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User created successfully");

    let user = app.store.find_by_username("alice").await.unwrap().unwrap();
    assert_eq!(user.email, "alice@example.com");
    assert!(user.calendars.is_empty());
    assert_ne!(user.password_hash, "hunter22");
}

#[tokio::test]
async fn test_signup_missing_fields() {
    let app = create_test_app();

    for body in [
        json!({ "email": "a@example.com", "password": "pw" }),
        json!({ "username": "alice", "password": "pw" }),
        json!({ "username": "alice", "email": "a@example.com" }),
        json!({ "username": "", "email": "a@example.com", "password": "pw" }),
        json!({ "username": "alice", "email": "a@example.com", "password": "" }),
    ] {
        let (status, body) = post_json(&app, "/api/signup", None, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    assert_eq!(app.store.len().await, 0);
}

#[tokio::test]
async fn test_signup_duplicate_username_is_server_error() {
    let app = create_test_app();
    signup(&app, "alice", "hunter22").await;

    let (status, body) = post_json(
        &app,
        "/api/signup",
        None,
        json!({ "username": "alice", "email": "other@example.com", "password": "pw" }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Server error");
    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn test_signup_duplicate_email_is_server_error() {
    let app = create_test_app();
    signup(&app, "alice", "hunter22").await;

    let (status, _) = post_json(
        &app,
        "/api/signup",
        None,
        json!({ "username": "bob", "email": "alice@example.com", "password": "pw" }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_login_returns_verifiable_token() {
    let app = create_test_app();
    signup(&app, "alice", "hunter22").await;

    let (status, body) = login(&app, "alice", "hunter22").await;
    assert_eq!(status, StatusCode::OK);

    let token = body["token"].as_str().unwrap();
    let user_id = app.tokens.verify(token).unwrap();
    let user = app.store.find_by_username("alice").await.unwrap().unwrap();
    assert_eq!(user_id, user.id);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = create_test_app();
    signup(&app, "alice", "hunter22").await;

    let wrong_password = login(&app, "alice", "wrong").await;
    let unknown_user = login(&app, "mallory", "hunter22").await;

    assert_eq!(wrong_password.0, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_password, unknown_user);
    assert_eq!(wrong_password.1["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_missing_fields() {
    let app = create_test_app();

    let (status, _) = post_json(&app, "/api/login", None, json!({ "username": "alice" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(&app, "/api/login", None, json!({ "password": "pw" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = create_test_app();

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/signup")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid request body");
}

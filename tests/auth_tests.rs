// SPDX-License-Identifier: MIT

//! Registration, login, and profile flows.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use common::{bare_request, body_json, create_test_app, json_request, register_user};

#[tokio::test]
async fn register_returns_user_and_token() {
    let (app, _state) = create_test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({
                "email": "ada@example.com",
                "password": "hunter22",
                "firstName": "Ada",
                "lastName": "Lovelace",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"]["email"], "ada@example.com");
    assert_eq!(body["data"]["user"]["firstName"], "Ada");
    assert!(body["data"]["token"].as_str().is_some());

    // Credentials never appear in responses.
    assert!(body["data"]["user"].get("password").is_none());
    assert!(body["data"]["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn register_rejects_bad_input_with_field_errors() {
    let (app, _state) = create_test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({
                "email": "not-an-email",
                "password": "short",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);

    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"password"));
    assert!(fields.contains(&"firstName"));
    assert!(fields.contains(&"lastName"));
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let (app, _state) = create_test_app().await;
    register_user(&app, "ada@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({
                "email": "ada@example.com",
                "password": "hunter22",
                "firstName": "Ada",
                "lastName": "Again",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Email already registered");
}

#[tokio::test]
async fn login_succeeds_with_correct_credentials() {
    let (app, _state) = create_test_app().await;
    register_user(&app, "ada@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({"email": "ada@example.com", "password": "hunter22"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert!(body["data"]["token"].as_str().is_some());
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let (app, _state) = create_test_app().await;
    register_user(&app, "ada@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({"email": "ada@example.com", "password": "wrong-password"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_rejects_unknown_email() {
    let (app, _state) = create_test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({"email": "nobody@example.com", "password": "hunter22"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let (app, _state) = create_test_app().await;

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/api/trips", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/api/trips", Some("not-a-jwt")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_round_trip() {
    let (app, _state) = create_test_app().await;
    let (token, user_id) = register_user(&app, "ada@example.com").await;

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/api/users/profile", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["id"], user_id.as_str());
    assert_eq!(body["data"]["preferences"]["currency"], "USD");

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/users/profile",
            Some(&token),
            json!({
                "firstName": "Augusta",
                "preferences": {"currency": "GBP", "interests": ["museums"]},
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["firstName"], "Augusta");
    assert_eq!(body["data"]["lastName"], "User");
    assert_eq!(body["data"]["preferences"]["currency"], "GBP");
}

#[tokio::test]
async fn change_password_requires_current_password() {
    let (app, _state) = create_test_app().await;
    let (token, _) = register_user(&app, "ada@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/change-password",
            Some(&token),
            json!({"currentPassword": "wrong", "newPassword": "new-password"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/change-password",
            Some(&token),
            json!({"currentPassword": "hunter22", "newPassword": "new-password"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Old password no longer works, new one does.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({"email": "ada@example.com", "password": "hunter22"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({"email": "ada@example.com", "password": "new-password"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_check_is_public() {
    let (app, _state) = create_test_app().await;

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/health", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

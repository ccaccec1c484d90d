// SPDX-License-Identifier: MIT

//! Chat messages and per-trip history.

mod common;

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use tower::ServiceExt;
use wayfarer::config::Config;

use common::{
    bare_request, body_json, create_test_app_with_config, create_trip, genai_reply, json_request,
    register_user, spawn_stub,
};

fn chat_stub(reply_text: String) -> Router {
    Router::new().route(
        "/models/{call}",
        post(move || {
            let reply = genai_reply(&reply_text);
            async move { Json(reply) }
        }),
    )
}

async fn chat_app(reply_text: &str) -> (Router, String, String) {
    let mut config = Config::test_default();
    config.genai_base_url = spawn_stub(chat_stub(reply_text.to_string())).await;
    let (app, _state) = create_test_app_with_config(config).await;

    let (token, _) = register_user(&app, "ada@example.com").await;
    let trip_id = create_trip(&app, &token, "Paris in June").await;
    (app, token, trip_id)
}

#[tokio::test]
async fn chat_replies_and_records_history() {
    let (app, token, trip_id) = chat_app(
        "Paris is lovely in June.\nI recommend wandering the Marais.\nConsider booking museums early.",
    )
    .await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/chat/message",
            Some(&token),
            json!({
                "message": "What should I know about my trip?",
                "context": {"currentTripId": trip_id}
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("Paris is lovely"));
    // The recommend/consider lines surface as suggestions.
    assert_eq!(body["data"]["suggestions"].as_array().unwrap().len(), 2);

    let response = app
        .clone()
        .oneshot(bare_request(
            "GET",
            &format!("/api/chat/history/{trip_id}"),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["totalCount"], 1);
    let first = &body["data"]["messages"][0];
    assert_eq!(first["message"], "What should I know about my trip?");
    assert!(first["response"].as_str().unwrap().contains("Marais"));
    assert_eq!(first["tripId"], trip_id.as_str());
}

#[tokio::test]
async fn chat_rejects_empty_messages() {
    let (app, token, _trip_id) = chat_app("unused").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/chat/message",
            Some(&token),
            json!({"message": "   "}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["errors"][0]["field"], "message");
}

#[tokio::test]
async fn chat_rejects_context_referencing_foreign_trip() {
    let (app, _token, trip_id) = chat_app("unused").await;
    let (other_token, _) = register_user(&app, "other@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/chat/message",
            Some(&other_token),
            json!({
                "message": "Tell me about this trip",
                "context": {"currentTripId": trip_id}
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn history_pages_oldest_first() {
    let (app, token, trip_id) = chat_app("Short answer.").await;

    for i in 1..=15 {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/chat/message",
                Some(&token),
                json!({
                    "message": format!("Question {i}"),
                    "context": {"currentTripId": trip_id}
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(bare_request(
            "GET",
            &format!("/api/chat/history/{trip_id}?page=1&limit=10"),
            Some(&token),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["totalCount"], 15);
    assert_eq!(body["data"]["totalPages"], 2);
    let messages = body["data"]["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 10);
    assert_eq!(messages[0]["message"], "Question 1");

    let response = app
        .clone()
        .oneshot(bare_request(
            "GET",
            &format!("/api/chat/history/{trip_id}?page=2&limit=10"),
            Some(&token),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let messages = body["data"]["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 5);
    assert_eq!(messages[0]["message"], "Question 11");
}

#[tokio::test]
async fn history_requires_trip_ownership() {
    let (app, _token, trip_id) = chat_app("unused").await;
    let (other_token, _) = register_user(&app, "other@example.com").await;

    let response = app
        .clone()
        .oneshot(bare_request(
            "GET",
            &format!("/api/chat/history/{trip_id}"),
            Some(&other_token),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

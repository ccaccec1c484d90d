// SPDX-License-Identifier: MIT

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // for oneshot
use wayfarer::config::Config;
use wayfarer::db::Database;
use wayfarer::routes::create_router;
use wayfarer::services::{
    CurrencyService, GenAiClient, GenerationService, PlacesService, TranslationService,
    WeatherService,
};
use wayfarer::AppState;

/// Create a test app over an in-memory database. Default config points
/// external adapters at an unroutable address, so anything unstubbed
/// fails fast.
#[allow(dead_code)]
pub async fn create_test_app() -> (Router, Arc<AppState>) {
    create_test_app_with_config(Config::test_default()).await
}

/// Create a test app with a caller-adjusted config (usually external
/// base URLs pointed at stub servers).
#[allow(dead_code)]
pub async fn create_test_app_with_config(config: Config) -> (Router, Arc<AppState>) {
    let db = Database::connect_in_memory()
        .await
        .expect("Failed to open in-memory database");

    let state = Arc::new(AppState {
        weather: WeatherService::new(&config),
        currency: CurrencyService::new(&config),
        places: PlacesService::new(&config),
        generation: GenerationService::new(GenAiClient::new(&config)),
        translation: TranslationService::new(GenAiClient::new(&config)),
        config,
        db,
    });

    (create_router(state.clone()), state)
}

/// Serve a stub router on an ephemeral port, returning its base URL.
#[allow(dead_code)]
pub async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub listener");
    let addr = listener.local_addr().expect("Stub listener has no address");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Stub server failed");
    });

    format!("http://{addr}")
}

/// Wrap text the way the generative API returns it.
#[allow(dead_code)]
pub fn genai_reply(text: &str) -> Value {
    json!({
        "candidates": [
            {"content": {"parts": [{"text": text}]}}
        ]
    })
}

/// Read and parse a JSON response body.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&body).expect("Response body was not JSON")
}

/// Build a JSON request with an optional bearer token.
#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Build a bodyless request with an optional bearer token.
#[allow(dead_code)]
pub fn bare_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// Register a user and return (token, user_id).
#[allow(dead_code)]
pub async fn register_user(app: &Router, email: &str) -> (String, String) {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({
                "email": email,
                "password": "hunter22",
                "firstName": "Test",
                "lastName": "User",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let token = body["data"]["token"].as_str().unwrap().to_string();
    let user_id = body["data"]["user"]["id"].as_str().unwrap().to_string();
    (token, user_id)
}

/// Create a trip for the user and return its id. External enrichment
/// will fail quietly unless stubbed, which is fine for most tests.
#[allow(dead_code)]
pub async fn create_trip(app: &Router, token: &str, title: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/trips",
            Some(token),
            json!({
                "title": title,
                "destination": {
                    "name": "Paris, France",
                    "coordinates": {"lat": 48.8566, "lng": 2.3522}
                },
                "startDate": "2026-06-01",
                "endDate": "2026-06-05",
                "budget": {"total": 2000.0, "currency": "EUR"},
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    body["data"]["trip"]["id"].as_str().unwrap().to_string()
}

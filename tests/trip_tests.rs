// SPDX-License-Identifier: MIT

//! Trip CRUD, validation, pagination, and ownership scoping.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use common::{bare_request, body_json, create_test_app, create_trip, json_request, register_user};

#[tokio::test]
async fn create_trip_defaults_to_planning() {
    let (app, _state) = create_test_app().await;
    let (token, _) = register_user(&app, "ada@example.com").await;

    let trip_id = create_trip(&app, &token, "Paris in June").await;

    let response = app
        .clone()
        .oneshot(bare_request(
            "GET",
            &format!("/api/trips/{trip_id}"),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let trip = &body["data"]["trip"];
    assert_eq!(trip["title"], "Paris in June");
    assert_eq!(trip["status"], "planning");
    assert_eq!(trip["destination"]["name"], "Paris, France");
    assert_eq!(trip["itineraries"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn create_trip_rejects_inverted_dates() {
    let (app, _state) = create_test_app().await;
    let (token, _) = register_user(&app, "ada@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/trips",
            Some(&token),
            json!({
                "title": "Backwards",
                "destination": {
                    "name": "Paris, France",
                    "coordinates": {"lat": 48.8566, "lng": 2.3522}
                },
                "startDate": "2026-06-05",
                "endDate": "2026-06-01",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["errors"][0]["field"], "endDate");

    // Nothing was written.
    let response = app
        .clone()
        .oneshot(bare_request("GET", "/api/trips", Some(&token)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["totalCount"], 0);
}

#[tokio::test]
async fn create_trip_requires_destination_and_dates() {
    let (app, _state) = create_test_app().await;
    let (token, _) = register_user(&app, "ada@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/trips",
            Some(&token),
            json!({"title": "Nowhere"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"destination"));
    assert!(fields.contains(&"startDate"));
    assert!(fields.contains(&"endDate"));
}

#[tokio::test]
async fn list_trips_paginates_newest_first() {
    let (app, _state) = create_test_app().await;
    let (token, _) = register_user(&app, "ada@example.com").await;

    for i in 1..=12 {
        create_trip(&app, &token, &format!("Trip {i}")).await;
    }

    let response = app
        .clone()
        .oneshot(bare_request(
            "GET",
            "/api/trips?page=1&limit=10",
            Some(&token),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["totalCount"], 12);
    assert_eq!(body["data"]["totalPages"], 2);
    assert_eq!(body["data"]["currentPage"], 1);
    let trips = body["data"]["trips"].as_array().unwrap();
    assert_eq!(trips.len(), 10);
    assert_eq!(trips[0]["title"], "Trip 12");

    let response = app
        .clone()
        .oneshot(bare_request(
            "GET",
            "/api/trips?page=2&limit=10",
            Some(&token),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["trips"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["currentPage"], 2);
}

#[tokio::test]
async fn list_trips_filters_by_status() {
    let (app, _state) = create_test_app().await;
    let (token, _) = register_user(&app, "ada@example.com").await;

    let first = create_trip(&app, &token, "Keep planning").await;
    let second = create_trip(&app, &token, "Confirm me").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/trips/{second}"),
            Some(&token),
            json!({"status": "confirmed"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(bare_request(
            "GET",
            "/api/trips?status=confirmed",
            Some(&token),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["totalCount"], 1);
    assert_eq!(body["data"]["trips"][0]["id"], second.as_str());

    let response = app
        .clone()
        .oneshot(bare_request(
            "GET",
            "/api/trips?status=planning",
            Some(&token),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["trips"][0]["id"], first.as_str());

    // Unknown status values are rejected, not silently ignored.
    let response = app
        .clone()
        .oneshot(bare_request(
            "GET",
            "/api/trips?status=imaginary",
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_trip_merges_partial_fields() {
    let (app, _state) = create_test_app().await;
    let (token, _) = register_user(&app, "ada@example.com").await;
    let trip_id = create_trip(&app, &token, "Original title").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/trips/{trip_id}"),
            Some(&token),
            json!({"title": "Renamed", "description": "Now with notes"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let trip = &body["data"]["trip"];
    assert_eq!(trip["title"], "Renamed");
    assert_eq!(trip["description"], "Now with notes");
    // Untouched fields survive the merge.
    assert_eq!(trip["destination"]["name"], "Paris, France");
    assert_eq!(trip["startDate"], "2026-06-01");
}

#[tokio::test]
async fn update_trip_revalidates_dates() {
    let (app, _state) = create_test_app().await;
    let (token, _) = register_user(&app, "ada@example.com").await;
    let trip_id = create_trip(&app, &token, "Valid dates").await;

    // Moving the end before the stored start must fail.
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/trips/{trip_id}"),
            Some(&token),
            json!({"endDate": "2026-05-01"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["errors"][0]["field"], "endDate");
}

#[tokio::test]
async fn delete_trip_removes_it() {
    let (app, _state) = create_test_app().await;
    let (token, _) = register_user(&app, "ada@example.com").await;
    let trip_id = create_trip(&app, &token, "Short lived").await;

    let response = app
        .clone()
        .oneshot(bare_request(
            "DELETE",
            &format!("/api/trips/{trip_id}"),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(bare_request(
            "GET",
            &format!("/api/trips/{trip_id}"),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn trips_are_scoped_to_their_owner() {
    let (app, _state) = create_test_app().await;
    let (owner_token, _) = register_user(&app, "owner@example.com").await;
    let (other_token, _) = register_user(&app, "other@example.com").await;
    let trip_id = create_trip(&app, &owner_token, "Private trip").await;

    // Another user's trip is indistinguishable from a missing one.
    for request in [
        bare_request("GET", &format!("/api/trips/{trip_id}"), Some(&other_token)),
        bare_request(
            "DELETE",
            &format!("/api/trips/{trip_id}"),
            Some(&other_token),
        ),
        json_request(
            "PUT",
            &format!("/api/trips/{trip_id}"),
            Some(&other_token),
            json!({"title": "Hijacked"}),
        ),
    ] {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    // And it does not leak into the other user's listing.
    let response = app
        .clone()
        .oneshot(bare_request("GET", "/api/trips", Some(&other_token)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["totalCount"], 0);
}

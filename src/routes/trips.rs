// SPDX-License-Identifier: MIT

//! Trip CRUD and itinerary generation routes.

use crate::db::{NewTrip, TripPatch};
use crate::error::{AppError, FieldError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::trip::DestinationGuide;
use crate::models::{
    Budget, Coordinates, GeneratedItinerary, NamedLocation, Trip, TripDetail, TripPreferences,
    TripStatus,
};
use crate::response::ApiResponse;
use crate::services::weather::LocationQuery;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 100;
const MIN_TITLE_LENGTH: usize = 3;
const MAX_TITLE_LENGTH: usize = 100;

/// Trip routes (require authentication via JWT).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/trips", get(list_trips).post(create_trip))
        .route(
            "/api/trips/{id}",
            get(get_trip).put(update_trip).delete(delete_trip),
        )
        .route("/api/trips/{id}/generate-itinerary", post(generate_itinerary))
        .route(
            "/api/trips/{id}/regenerate-suggestions",
            post(regenerate_suggestions),
        )
}

// ─── Listing ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct TripListQuery {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripListPayload {
    pub trips: Vec<TripDetail>,
    pub total_count: i64,
    pub total_pages: i64,
    pub current_page: u32,
}

/// Page of the user's trips, newest first.
async fn list_trips(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<TripListQuery>,
) -> Result<Json<ApiResponse<TripListPayload>>> {
    let status = query.status.as_deref().map(parse_status).transpose()?;
    let page = query.page.unwrap_or(1).max(1);
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let (trips, total_count) = state.db.list_trips(&auth.user_id, status, page, limit).await?;

    Ok(Json(ApiResponse::data(TripListPayload {
        trips,
        total_count,
        total_pages: (total_count + limit as i64 - 1) / limit as i64,
        current_page: page,
    })))
}

fn parse_status(raw: &str) -> Result<TripStatus> {
    match raw {
        "planning" => Ok(TripStatus::Planning),
        "confirmed" => Ok(TripStatus::Confirmed),
        "ongoing" => Ok(TripStatus::Ongoing),
        "completed" => Ok(TripStatus::Completed),
        "cancelled" => Ok(TripStatus::Cancelled),
        other => Err(AppError::BadRequest(format!("Invalid status: {other}"))),
    }
}

// ─── Create / Update ─────────────────────────────────────────

/// Destination as sent by clients. Both parts are validated before a
/// [`NamedLocation`] is built, so partial input yields a field error
/// instead of a deserialization failure.
#[derive(Deserialize, Default)]
pub struct DestinationInput {
    pub name: Option<String>,
    pub coordinates: Option<Coordinates>,
}

impl DestinationInput {
    fn into_location(self, errors: &mut Vec<FieldError>) -> Option<NamedLocation> {
        match (self.name, self.coordinates) {
            (Some(name), Some(coordinates)) if !name.trim().is_empty() => Some(NamedLocation {
                name: name.trim().to_string(),
                coordinates,
            }),
            _ => {
                errors.push(FieldError::new(
                    "destination",
                    "Destination must have name and coordinates",
                ));
                None
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTripRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub destination: Option<DestinationInput>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub budget: Option<Budget>,
    pub preferences: Option<TripPreferences>,
    pub is_public: Option<bool>,
    pub cover_image: Option<String>,
}

#[derive(Serialize)]
pub struct TripPayload {
    pub trip: Trip,
}

#[derive(Serialize)]
pub struct TripDetailPayload {
    pub trip: TripDetail,
}

/// Create a trip, then enrich it with weather and destination
/// suggestions. Enrichment is best effort: failures are logged and the
/// trip is returned without that data.
async fn create_trip(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateTripRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TripPayload>>)> {
    let mut errors = Vec::new();

    let title = body.title.unwrap_or_default().trim().to_string();
    if !(MIN_TITLE_LENGTH..=MAX_TITLE_LENGTH).contains(&title.chars().count()) {
        errors.push(FieldError::new(
            "title",
            "Title must be 3 to 100 characters",
        ));
    }

    let destination = body
        .destination
        .unwrap_or_default()
        .into_location(&mut errors);
    let start_date = parse_date(body.start_date.as_deref(), "startDate", &mut errors);
    let end_date = parse_date(body.end_date.as_deref(), "endDate", &mut errors);

    let (Some(destination), Some(start_date), Some(end_date)) = (destination, start_date, end_date)
    else {
        return Err(AppError::Validation(errors));
    };
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let trip = state
        .db
        .create_trip(
            &auth.user_id,
            NewTrip {
                title,
                description: body.description,
                destination,
                start_date,
                end_date,
                budget: body.budget.unwrap_or_default(),
                preferences: body.preferences.unwrap_or_default(),
                is_public: body.is_public.unwrap_or(false),
                cover_image: body.cover_image,
            },
        )
        .await?;

    enrich_trip(&state, &trip).await;

    // Re-read so the response carries whatever enrichment landed.
    let trip = state
        .db
        .find_trip(&auth.user_id, &trip.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Trip not found".to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data_with_message(
            TripPayload { trip },
            "Trip created successfully",
        )),
    ))
}

/// Fetch weather and destination suggestions for a fresh trip. Both are
/// optional extras, so every failure path logs and returns.
async fn enrich_trip(state: &AppState, trip: &Trip) {
    match state
        .weather
        .forecast(
            LocationQuery::Coordinates(trip.destination.coordinates),
            Some(trip.start_date),
            Some(trip.end_date),
        )
        .await
    {
        Ok(report) => {
            if let Err(e) = state.db.set_weather_data(&trip.id, &report).await {
                tracing::warn!(trip_id = %trip.id, error = %e, "Failed to store weather data");
            }
        }
        Err(e) => {
            tracing::warn!(trip_id = %trip.id, error = %e, "Weather enrichment failed");
        }
    }

    match state
        .generation
        .destination_suggestions(&trip.destination, &trip.preferences)
        .await
    {
        Ok(guide) => {
            let mut suggestions = trip.suggestions();
            suggestions.destination_guide = Some(guide);
            if let Err(e) = state.db.set_ai_suggestions(&trip.id, &suggestions).await {
                tracing::warn!(trip_id = %trip.id, error = %e, "Failed to store suggestions");
            }
        }
        Err(e) => {
            tracing::warn!(trip_id = %trip.id, error = %e, "Suggestion enrichment failed");
        }
    }
}

fn parse_date(
    raw: Option<&str>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<NaiveDate> {
    match raw {
        Some(s) => match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                errors.push(FieldError::new(field, "Expected a date in YYYY-MM-DD form"));
                None
            }
        },
        None => {
            errors.push(FieldError::new(field, "Date is required"));
            None
        }
    }
}

/// Get a trip with its itinerary days and activities.
async fn get_trip(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<TripDetailPayload>>> {
    let trip = state
        .db
        .trip_detail(&auth.user_id, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Trip not found".to_string()))?;

    Ok(Json(ApiResponse::data(TripDetailPayload { trip })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTripRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub destination: Option<DestinationInput>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub budget: Option<Budget>,
    pub preferences: Option<TripPreferences>,
    pub status: Option<String>,
    pub is_public: Option<bool>,
    pub cover_image: Option<String>,
}

/// Partial update of a trip; absent fields keep their current value.
async fn update_trip(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<UpdateTripRequest>,
) -> Result<Json<ApiResponse<TripPayload>>> {
    let trip = state
        .db
        .find_trip(&auth.user_id, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Trip not found".to_string()))?;

    let mut errors = Vec::new();

    let title = body.title.map(|t| t.trim().to_string());
    if let Some(title) = &title {
        if !(MIN_TITLE_LENGTH..=MAX_TITLE_LENGTH).contains(&title.chars().count()) {
            errors.push(FieldError::new(
                "title",
                "Title must be 3 to 100 characters",
            ));
        }
    }

    let destination = match body.destination {
        Some(input) => input.into_location(&mut errors),
        None => None,
    };
    let start_date = body
        .start_date
        .as_deref()
        .and_then(|s| match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                errors.push(FieldError::new(
                    "startDate",
                    "Expected a date in YYYY-MM-DD form",
                ));
                None
            }
        });
    let end_date = body
        .end_date
        .as_deref()
        .and_then(|s| match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                errors.push(FieldError::new(
                    "endDate",
                    "Expected a date in YYYY-MM-DD form",
                ));
                None
            }
        });
    let status = body.status.as_deref().map(parse_status).transpose()?;

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let updated = state
        .db
        .update_trip(
            &trip,
            TripPatch {
                title,
                description: body.description,
                destination,
                start_date,
                end_date,
                budget: body.budget,
                preferences: body.preferences,
                status,
                is_public: body.is_public,
                cover_image: body.cover_image,
            },
        )
        .await?;

    Ok(Json(ApiResponse::data_with_message(
        TripPayload { trip: updated },
        "Trip updated successfully",
    )))
}

/// Delete a trip and everything attached to it.
async fn delete_trip(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    let trip = state
        .db
        .find_trip(&auth.user_id, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Trip not found".to_string()))?;

    state.db.delete_trip(&trip).await?;
    tracing::info!(trip_id = %trip.id, "Trip deleted");

    Ok(Json(ApiResponse::message("Trip deleted successfully")))
}

// ─── Generation ──────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedTripPayload {
    pub trip: TripDetail,
    pub ai_itinerary: GeneratedItinerary,
}

/// Generate a day-by-day itinerary for a trip, replacing any days
/// generated before.
async fn generate_itinerary(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<GeneratedTripPayload>>> {
    let trip = state
        .db
        .find_trip(&auth.user_id, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Trip not found".to_string()))?;

    let generated = state.generation.generate_itinerary(&trip).await?;
    state.db.replace_generated_days(&trip, &generated).await?;

    let trip = state
        .db
        .trip_detail(&auth.user_id, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Trip not found".to_string()))?;
    tracing::info!(trip_id = %id, days = generated.days.len(), "Itinerary generated");

    Ok(Json(ApiResponse::data_with_message(
        GeneratedTripPayload {
            trip,
            ai_itinerary: generated,
        },
        "Itinerary generated successfully",
    )))
}

#[derive(Serialize)]
pub struct SuggestionsPayload {
    pub suggestions: DestinationGuide,
}

/// Re-request destination suggestions and merge them into the trip.
async fn regenerate_suggestions(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<SuggestionsPayload>>> {
    let trip = state
        .db
        .find_trip(&auth.user_id, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Trip not found".to_string()))?;

    let guide = state
        .generation
        .destination_suggestions(&trip.destination, &trip.preferences)
        .await?;

    let mut suggestions = trip.suggestions();
    suggestions.destination_guide = Some(guide.clone());
    state.db.set_ai_suggestions(&trip.id, &suggestions).await?;

    Ok(Json(ApiResponse::data_with_message(
        SuggestionsPayload { suggestions: guide },
        "Suggestions regenerated successfully",
    )))
}

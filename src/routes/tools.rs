// SPDX-License-Identifier: MIT

//! Travel utility routes: weather, currency, translation, places.
//!
//! Thin validation over the service adapters; no persistence.

use crate::error::{AppError, FieldError, Result};
use crate::models::{Coordinates, WeatherReport};
use crate::response::ApiResponse;
use crate::services::currency::Conversion;
use crate::services::places::{GeocodedAddress, PlaceDetails, PlaceSummary};
use crate::services::translation::Translation;
use crate::services::weather::LocationQuery;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Tool routes (require authentication via JWT).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/tools/weather", get(weather))
        .route("/api/tools/currency", get(convert_currency))
        .route("/api/tools/currency/supported", get(supported_currencies))
        .route("/api/tools/translate", post(translate))
        .route("/api/tools/detect-language", post(detect_language))
        .route("/api/tools/places", get(search_places))
        .route("/api/tools/places/details", get(place_details))
        .route("/api/tools/places/geocode", get(geocode))
}

// ─── Weather ─────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherQuery {
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Current conditions and forecast for a location given as a name or a
/// "lat,lng" pair.
async fn weather(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<ApiResponse<WeatherReport>>> {
    let location = query
        .location
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            AppError::Validation(vec![FieldError::new("location", "Location is required")])
        })?;

    let start_date = parse_optional_date(query.start_date.as_deref(), "startDate")?;
    let end_date = parse_optional_date(query.end_date.as_deref(), "endDate")?;

    let report = state
        .weather
        .forecast(LocationQuery::parse(location), start_date, end_date)
        .await?;

    Ok(Json(ApiResponse::data(report)))
}

fn parse_optional_date(raw: Option<&str>, field: &str) -> Result<Option<NaiveDate>> {
    match raw {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                AppError::Validation(vec![FieldError::new(
                    field,
                    "Expected a date in YYYY-MM-DD form",
                )])
            }),
    }
}

// ─── Currency ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CurrencyQuery {
    pub amount: Option<f64>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Convert an amount between currencies at the latest rate.
async fn convert_currency(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CurrencyQuery>,
) -> Result<Json<ApiResponse<Conversion>>> {
    let mut errors = Vec::new();

    let amount = match query.amount {
        Some(a) if a > 0.0 => Some(a),
        _ => {
            errors.push(FieldError::new("amount", "Amount must be a positive number"));
            None
        }
    };
    let from = require_code(query.from, "from", &mut errors);
    let to = require_code(query.to, "to", &mut errors);

    let (Some(amount), Some(from), Some(to)) = (amount, from, to) else {
        return Err(AppError::Validation(errors));
    };

    let conversion = state.currency.convert(amount, &from, &to).await?;
    Ok(Json(ApiResponse::data(conversion)))
}

fn require_code(
    raw: Option<String>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
        Some(code) => Some(code),
        None => {
            errors.push(FieldError::new(field, "Currency code is required"));
            None
        }
    }
}

#[derive(Serialize)]
pub struct SupportedCurrenciesPayload {
    pub currencies: Vec<String>,
}

/// Currency codes the conversion endpoint accepts.
async fn supported_currencies(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SupportedCurrenciesPayload>>> {
    let currencies = state.currency.supported_currencies().await?;
    Ok(Json(ApiResponse::data(SupportedCurrenciesPayload {
        currencies,
    })))
}

// ─── Translation ─────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    pub text: Option<String>,
    pub target_language: Option<String>,
    pub source_language: Option<String>,
}

/// Translate text to a target language.
async fn translate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TranslateRequest>,
) -> Result<Json<ApiResponse<Translation>>> {
    let mut errors = Vec::new();

    let text = body
        .text
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    if text.is_none() {
        errors.push(FieldError::new("text", "Text is required"));
    }

    let target = body
        .target_language
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty());
    if target.is_none() {
        errors.push(FieldError::new(
            "targetLanguage",
            "Target language is required",
        ));
    }

    let (Some(text), Some(target)) = (text, target) else {
        return Err(AppError::Validation(errors));
    };

    let translation = state
        .translation
        .translate(&text, &target, body.source_language.as_deref())
        .await?;

    Ok(Json(ApiResponse::data(translation)))
}

#[derive(Deserialize)]
pub struct DetectLanguageRequest {
    pub text: Option<String>,
}

#[derive(Serialize)]
pub struct DetectedLanguagePayload {
    pub language: String,
}

/// Detect the language of a text.
async fn detect_language(
    State(state): State<Arc<AppState>>,
    Json(body): Json<DetectLanguageRequest>,
) -> Result<Json<ApiResponse<DetectedLanguagePayload>>> {
    let text = body
        .text
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            AppError::Validation(vec![FieldError::new("text", "Text is required")])
        })?;

    let language = state.translation.detect_language(&text).await?;
    Ok(Json(ApiResponse::data(DetectedLanguagePayload { language })))
}

// ─── Places ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct PlaceSearchQuery {
    pub query: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Serialize)]
pub struct PlacesPayload {
    pub places: Vec<PlaceSummary>,
}

/// Free-text place search, optionally biased near coordinates.
async fn search_places(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PlaceSearchQuery>,
) -> Result<Json<ApiResponse<PlacesPayload>>> {
    let text = query
        .query
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            AppError::Validation(vec![FieldError::new("query", "Search query is required")])
        })?;

    let near = match (query.lat, query.lng) {
        (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
        _ => None,
    };

    let places = state.places.search(text, near).await?;
    Ok(Json(ApiResponse::data(PlacesPayload { places })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetailsQuery {
    pub place_id: Option<String>,
}

/// Details for a single place id.
async fn place_details(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PlaceDetailsQuery>,
) -> Result<Json<ApiResponse<PlaceDetails>>> {
    let place_id = query
        .place_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            AppError::Validation(vec![FieldError::new("placeId", "Place id is required")])
        })?;

    let details = state.places.place_details(place_id).await?;
    Ok(Json(ApiResponse::data(details)))
}

#[derive(Deserialize)]
pub struct GeocodeQuery {
    pub address: Option<String>,
}

/// Resolve a street address to coordinates.
async fn geocode(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GeocodeQuery>,
) -> Result<Json<ApiResponse<GeocodedAddress>>> {
    let address = query
        .address
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            AppError::Validation(vec![FieldError::new("address", "Address is required")])
        })?;

    let geocoded = state.places.geocode(address).await?;
    Ok(Json(ApiResponse::data(geocoded)))
}

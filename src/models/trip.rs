// SPDX-License-Identifier: MIT

//! Trip model and its typed attribute blobs.
//!
//! The destination, budget, preferences, AI-suggestion and weather
//! attributes are stored as JSON columns but carry explicit shapes so
//! they stay validated at the boundary.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use super::itinerary::ItineraryDay;

/// Geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A place with a display name and coordinates. Used for trip
/// destinations and activity locations; both require the full pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedLocation {
    pub name: String,
    pub coordinates: Coordinates,
}

/// Trip budget with a per-category breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Budget {
    pub total: f64,
    pub currency: String,
    pub breakdown: BudgetBreakdown,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            total: 0.0,
            currency: "USD".to_string(),
            breakdown: BudgetBreakdown::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BudgetBreakdown {
    pub accommodation: f64,
    pub food: f64,
    pub transport: f64,
    pub activities: f64,
    pub other: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelStyle {
    Relaxed,
    #[default]
    Balanced,
    Adventurous,
    Cultural,
    Luxury,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    Slow,
    #[default]
    Moderate,
    Fast,
}

/// Per-trip planning preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TripPreferences {
    pub travel_style: TravelStyle,
    pub interests: Vec<String>,
    pub group_size: u32,
    pub pace: Pace,
}

impl Default for TripPreferences {
    fn default() -> Self {
        Self {
            travel_style: TravelStyle::default(),
            interests: Vec::new(),
            group_size: 1,
            pace: Pace::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TripStatus {
    Planning,
    Confirmed,
    Ongoing,
    Completed,
    Cancelled,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Planning => "planning",
            TripStatus::Confirmed => "confirmed",
            TripStatus::Ongoing => "ongoing",
            TripStatus::Completed => "completed",
            TripStatus::Cancelled => "cancelled",
        }
    }
}

/// AI-derived content attached to a trip. All fields optional: the
/// destination guide comes from trip-creation enrichment or the
/// regenerate-suggestions operation, the rest from itinerary generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiSuggestions {
    pub destination_guide: Option<DestinationGuide>,
    pub generated_overview: Option<ItineraryOverview>,
    pub packing_list: Vec<String>,
    pub important_notes: Vec<String>,
}

/// Destination suggestions requested from the generative backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DestinationGuide {
    pub attractions: Vec<Attraction>,
    pub cuisine: Vec<CuisineSuggestion>,
    pub etiquette: Vec<String>,
    pub neighborhoods: Vec<Neighborhood>,
    pub transportation: Option<TransportationTips>,
    pub safety: Option<SafetyTips>,
    pub budget_estimates: Option<BudgetEstimates>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Attraction {
    pub name: String,
    pub description: String,
    pub category: String,
    pub estimated_time: String,
    pub cost: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CuisineSuggestion {
    pub dish: String,
    pub description: String,
    pub where_to_try: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Neighborhood {
    pub name: String,
    pub description: String,
    pub price_range: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransportationTips {
    pub local: String,
    pub from_airport: String,
    pub tips: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SafetyTips {
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BudgetEstimates {
    pub budget: String,
    pub mid_range: String,
    pub luxury: String,
}

/// High-level summary of a generated itinerary, merged into the trip's
/// suggestions after generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItineraryOverview {
    pub total_days: u32,
    pub highlights: Vec<String>,
    pub estimated_cost: String,
}

// ─── Weather snapshot ────────────────────────────────────────

/// Weather snapshot stored against a trip and returned by the weather
/// tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastEntry>,
    pub location: ResolvedLocation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub conditions: String,
    pub description: String,
    pub wind_speed: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastEntry {
    pub time: String,
    pub temperature: f64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLocation {
    pub name: String,
    pub country: Option<String>,
    pub coordinates: Coordinates,
}

// ─── Trip ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub destination: Json<NamedLocation>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: Json<Budget>,
    pub preferences: Json<TripPreferences>,
    pub status: TripStatus,
    pub is_public: bool,
    pub ai_suggestions: Option<Json<AiSuggestions>>,
    pub weather_data: Option<Json<WeatherReport>>,
    pub cover_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Trip {
    /// Number of days the trip spans, inclusive of both endpoints.
    /// A trip from June 1 to June 5 is five days.
    pub fn duration_days(&self) -> u32 {
        ((self.end_date - self.start_date).num_days() + 1) as u32
    }

    /// Current suggestions blob, or an empty one.
    pub fn suggestions(&self) -> AiSuggestions {
        self.ai_suggestions
            .as_ref()
            .map(|j| j.0.clone())
            .unwrap_or_default()
    }
}

/// Trip with its generated days and their activities attached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDetail {
    #[serde(flatten)]
    pub trip: Trip,
    pub itineraries: Vec<ItineraryDay>,
}

// SPDX-License-Identifier: MIT

//! Itinerary and activity models, plus the shapes parsed out of the
//! generative backend's itinerary reply.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::types::Json;

use super::trip::{ItineraryOverview, NamedLocation};

/// One day's plan within a trip.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    pub id: String,
    pub trip_id: String,
    pub day: i64,
    pub date: NaiveDate,
    pub theme: String,
    pub notes: Option<String>,
    pub estimated_cost: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One scheduled item within an itinerary day.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub itinerary_id: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<Json<NamedLocation>>,
    pub start_time: Option<String>,
    pub duration: Option<String>,
    pub estimated_cost: f64,
    pub category: Option<String>,
    pub notes: Option<String>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An itinerary day with its activities attached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryDay {
    #[serde(flatten)]
    pub itinerary: Itinerary,
    pub activities: Vec<Activity>,
}

// ─── Generated itinerary shapes ──────────────────────────────
//
// The generative backend is asked for JSON in this shape but is not
// guaranteed to honor it, so every field has a lenient default and
// costs accept either numbers or strings.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratedItinerary {
    pub overview: ItineraryOverview,
    pub days: Vec<GeneratedDay>,
    pub packing_list: Vec<String>,
    pub important_notes: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratedDay {
    pub day: u32,
    #[serde(deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,
    pub theme: String,
    pub activities: Vec<GeneratedActivity>,
    pub meals: Vec<GeneratedMeal>,
    pub transportation: Option<String>,
    pub notes: Option<String>,
    #[serde(deserialize_with = "lenient_cost")]
    pub estimated_cost: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratedActivity {
    pub time: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<NamedLocation>,
    pub duration: Option<String>,
    #[serde(deserialize_with = "lenient_cost")]
    pub cost: f64,
    pub category: Option<String>,
    pub tips: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratedMeal {
    #[serde(rename = "type")]
    pub meal_type: Option<String>,
    pub restaurant: Option<String>,
    pub cuisine: Option<String>,
    pub cost: Option<String>,
}

/// Accept a cost as a JSON number, a numeric string (possibly with a
/// currency sign), or nothing at all.
fn lenient_cost<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s
            .trim_start_matches(|c: char| !c.is_ascii_digit() && c != '-')
            .parse()
            .unwrap_or(0.0),
        _ => 0.0,
    })
}

/// Accept an ISO date string, treating anything unparseable as absent.
fn lenient_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|s| s.parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_day_accepts_string_costs_and_bad_dates() {
        let day: GeneratedDay = serde_json::from_str(
            r#"{
                "day": 2,
                "date": "whenever",
                "theme": "Museums",
                "activities": [
                    {"title": "Louvre", "cost": "$25", "category": "attraction"},
                    {"title": "Walk", "cost": 0}
                ],
                "estimatedCost": "40"
            }"#,
        )
        .unwrap();

        assert_eq!(day.day, 2);
        assert_eq!(day.date, None);
        assert_eq!(day.activities[0].cost, 25.0);
        assert_eq!(day.activities[1].cost, 0.0);
        assert_eq!(day.estimated_cost, 40.0);
    }

    #[test]
    fn generated_itinerary_defaults_when_fields_missing() {
        let parsed: GeneratedItinerary = serde_json::from_str("{}").unwrap();
        assert!(parsed.days.is_empty());
        assert!(parsed.packing_list.is_empty());
        assert_eq!(parsed.overview.total_days, 0);
    }
}

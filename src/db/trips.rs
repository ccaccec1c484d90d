// SPDX-License-Identifier: MIT

//! Trip, itinerary, and activity persistence.
//!
//! Schema invariants (end date after start date, destination carrying
//! both a name and coordinates) are re-checked here so no write path
//! can bypass them.

use chrono::{Days, NaiveDate, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use super::Database;
use crate::error::{AppError, FieldError};
use crate::models::{
    Activity, AiSuggestions, Budget, GeneratedItinerary, Itinerary, ItineraryDay, NamedLocation,
    Trip, TripDetail, TripPreferences, TripStatus, WeatherReport,
};

const DEFAULT_THEME: &str = "Exploration";

/// Attributes for creating a trip.
#[derive(Debug, Clone)]
pub struct NewTrip {
    pub title: String,
    pub description: Option<String>,
    pub destination: NamedLocation,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: Budget,
    pub preferences: TripPreferences,
    pub is_public: bool,
    pub cover_image: Option<String>,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct TripPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub destination: Option<NamedLocation>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub budget: Option<Budget>,
    pub preferences: Option<TripPreferences>,
    pub status: Option<TripStatus>,
    pub is_public: Option<bool>,
    pub cover_image: Option<String>,
}

fn check_invariants(
    destination: &NamedLocation,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(), AppError> {
    let mut errors = Vec::new();
    if destination.name.trim().is_empty() {
        errors.push(FieldError::new(
            "destination",
            "Destination must have name and coordinates",
        ));
    }
    if end <= start {
        errors.push(FieldError::new(
            "endDate",
            "End date must be after start date",
        ));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

impl Database {
    pub async fn create_trip(&self, user_id: &str, new: NewTrip) -> Result<Trip, AppError> {
        check_invariants(&new.destination, new.start_date, new.end_date)?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let trip = sqlx::query_as::<_, Trip>(
            "INSERT INTO trips \
             (id, user_id, title, description, destination, start_date, end_date, budget, \
              preferences, status, is_public, cover_image, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING *",
        )
        .bind(&id)
        .bind(user_id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(Json(&new.destination))
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(Json(&new.budget))
        .bind(Json(&new.preferences))
        .bind(TripStatus::Planning)
        .bind(new.is_public)
        .bind(&new.cover_image)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool())
        .await?;

        Ok(trip)
    }

    /// Fetch a trip scoped to its owner. Trips belonging to other users
    /// are indistinguishable from absent ones.
    pub async fn find_trip(&self, user_id: &str, trip_id: &str) -> Result<Option<Trip>, AppError> {
        let trip = sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE id = ? AND user_id = ?")
            .bind(trip_id)
            .bind(user_id)
            .fetch_optional(self.pool())
            .await?;
        Ok(trip)
    }

    /// Fetch a trip with its itineraries and activities attached.
    pub async fn trip_detail(
        &self,
        user_id: &str,
        trip_id: &str,
    ) -> Result<Option<TripDetail>, AppError> {
        match self.find_trip(user_id, trip_id).await? {
            Some(trip) => Ok(Some(self.attach_days(trip).await?)),
            None => Ok(None),
        }
    }

    /// Page of the user's trips, newest first, optionally filtered by
    /// status, with the total row count for the filter.
    pub async fn list_trips(
        &self,
        user_id: &str,
        status: Option<TripStatus>,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<TripDetail>, i64), AppError> {
        let offset = (page.saturating_sub(1) as i64) * limit as i64;

        let (trips, total) = match status {
            Some(status) => {
                let trips = sqlx::query_as::<_, Trip>(
                    "SELECT * FROM trips WHERE user_id = ? AND status = ? \
                     ORDER BY created_at DESC, rowid DESC LIMIT ? OFFSET ?",
                )
                .bind(user_id)
                .bind(status)
                .bind(limit as i64)
                .bind(offset)
                .fetch_all(self.pool())
                .await?;

                let total: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*) FROM trips WHERE user_id = ? AND status = ?",
                )
                .bind(user_id)
                .bind(status)
                .fetch_one(self.pool())
                .await?;

                (trips, total)
            }
            None => {
                let trips = sqlx::query_as::<_, Trip>(
                    "SELECT * FROM trips WHERE user_id = ? \
                     ORDER BY created_at DESC, rowid DESC LIMIT ? OFFSET ?",
                )
                .bind(user_id)
                .bind(limit as i64)
                .bind(offset)
                .fetch_all(self.pool())
                .await?;

                let total: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM trips WHERE user_id = ?")
                        .bind(user_id)
                        .fetch_one(self.pool())
                        .await?;

                (trips, total)
            }
        };

        let mut details = Vec::with_capacity(trips.len());
        for trip in trips {
            details.push(self.attach_days(trip).await?);
        }
        Ok((details, total))
    }

    /// Apply a partial update, re-validating the schema invariants
    /// against the merged result.
    pub async fn update_trip(&self, trip: &Trip, patch: TripPatch) -> Result<Trip, AppError> {
        let title = patch.title.unwrap_or_else(|| trip.title.clone());
        let description = patch.description.or_else(|| trip.description.clone());
        let destination = patch.destination.unwrap_or_else(|| trip.destination.0.clone());
        let start_date = patch.start_date.unwrap_or(trip.start_date);
        let end_date = patch.end_date.unwrap_or(trip.end_date);
        let budget = patch.budget.unwrap_or_else(|| trip.budget.0.clone());
        let preferences = patch
            .preferences
            .unwrap_or_else(|| trip.preferences.0.clone());
        let status = patch.status.unwrap_or(trip.status);
        let is_public = patch.is_public.unwrap_or(trip.is_public);
        let cover_image = patch.cover_image.or_else(|| trip.cover_image.clone());

        check_invariants(&destination, start_date, end_date)?;

        let updated = sqlx::query_as::<_, Trip>(
            "UPDATE trips SET title = ?, description = ?, destination = ?, start_date = ?, \
             end_date = ?, budget = ?, preferences = ?, status = ?, is_public = ?, \
             cover_image = ?, updated_at = ? \
             WHERE id = ? RETURNING *",
        )
        .bind(&title)
        .bind(&description)
        .bind(Json(&destination))
        .bind(start_date)
        .bind(end_date)
        .bind(Json(&budget))
        .bind(Json(&preferences))
        .bind(status)
        .bind(is_public)
        .bind(&cover_image)
        .bind(Utc::now())
        .bind(&trip.id)
        .fetch_one(self.pool())
        .await?;

        Ok(updated)
    }

    /// Delete a trip. Itineraries, activities, and trip-scoped chat
    /// history go with it via the schema's cascade rules.
    pub async fn delete_trip(&self, trip: &Trip) -> Result<(), AppError> {
        sqlx::query("DELETE FROM trips WHERE id = ?")
            .bind(&trip.id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    pub async fn set_weather_data(
        &self,
        trip_id: &str,
        weather: &WeatherReport,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE trips SET weather_data = ?, updated_at = ? WHERE id = ?")
            .bind(Json(weather))
            .bind(Utc::now())
            .bind(trip_id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    pub async fn set_ai_suggestions(
        &self,
        trip_id: &str,
        suggestions: &AiSuggestions,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE trips SET ai_suggestions = ?, updated_at = ? WHERE id = ?")
            .bind(Json(suggestions))
            .bind(Utc::now())
            .bind(trip_id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    /// Persist a generated itinerary: all day and activity rows plus the
    /// suggestions merge happen in one transaction, so a mid-loop failure
    /// cannot leave the trip with partial days. Any previously generated
    /// days are replaced.
    pub async fn replace_generated_days(
        &self,
        trip: &Trip,
        generated: &GeneratedItinerary,
    ) -> Result<(), AppError> {
        let merged = {
            let mut suggestions = trip.suggestions();
            suggestions.generated_overview = Some(generated.overview.clone());
            suggestions.packing_list = generated.packing_list.clone();
            suggestions.important_notes = generated.important_notes.clone();
            suggestions
        };

        let now = Utc::now();
        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM itineraries WHERE trip_id = ?")
            .bind(&trip.id)
            .execute(&mut *tx)
            .await?;

        for day in &generated.days {
            let itinerary_id = Uuid::new_v4().to_string();
            let date = day.date.unwrap_or_else(|| {
                trip.start_date
                    .checked_add_days(Days::new(day.day.saturating_sub(1) as u64))
                    .unwrap_or(trip.start_date)
            });
            let theme = if day.theme.trim().is_empty() {
                DEFAULT_THEME
            } else {
                day.theme.as_str()
            };

            sqlx::query(
                "INSERT INTO itineraries \
                 (id, trip_id, day, date, theme, notes, estimated_cost, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&itinerary_id)
            .bind(&trip.id)
            .bind(day.day as i64)
            .bind(date)
            .bind(theme)
            .bind(&day.notes)
            .bind(day.estimated_cost)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            for activity in &day.activities {
                sqlx::query(
                    "INSERT INTO activities \
                     (id, itinerary_id, title, description, location, start_time, duration, \
                      estimated_cost, category, notes, is_completed, created_at, updated_at) \
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)",
                )
                .bind(Uuid::new_v4().to_string())
                .bind(&itinerary_id)
                .bind(&activity.title)
                .bind(&activity.description)
                .bind(activity.location.as_ref().map(Json))
                .bind(&activity.time)
                .bind(&activity.duration)
                .bind(activity.cost)
                .bind(&activity.category)
                .bind(&activity.tips)
                .bind(now)
                .bind(now)
                .execute(&mut *tx)
                .await?;
            }
        }

        sqlx::query("UPDATE trips SET ai_suggestions = ?, updated_at = ? WHERE id = ?")
            .bind(Json(&merged))
            .bind(now)
            .bind(&trip.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn attach_days(&self, trip: Trip) -> Result<TripDetail, AppError> {
        let itineraries = sqlx::query_as::<_, Itinerary>(
            "SELECT * FROM itineraries WHERE trip_id = ? ORDER BY day ASC",
        )
        .bind(&trip.id)
        .fetch_all(self.pool())
        .await?;

        let mut days = Vec::with_capacity(itineraries.len());
        for itinerary in itineraries {
            let activities = sqlx::query_as::<_, Activity>(
                "SELECT * FROM activities WHERE itinerary_id = ? ORDER BY rowid ASC",
            )
            .bind(&itinerary.id)
            .fetch_all(self.pool())
            .await?;
            days.push(ItineraryDay {
                itinerary,
                activities,
            });
        }

        Ok(TripDetail {
            trip,
            itineraries: days,
        })
    }
}

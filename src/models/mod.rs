// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod chat;
pub mod itinerary;
pub mod trip;
pub mod user;

pub use chat::{ChatContext, ChatHistory};
pub use itinerary::{Activity, GeneratedDay, GeneratedItinerary, Itinerary, ItineraryDay};
pub use trip::{
    AiSuggestions, Budget, Coordinates, NamedLocation, Trip, TripDetail, TripPreferences,
    TripStatus, WeatherReport,
};
pub use user::{User, UserPreferences, UserProfile};

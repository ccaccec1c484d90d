// SPDX-License-Identifier: MIT

//! Wayfarer: AI-assisted travel planning backend
//!
//! This crate provides the REST API for managing trips, generating
//! itineraries and destination suggestions with a generative model, and
//! exposing travel utilities (weather, currency, translation, places).

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;

use config::Config;
use db::Database;
use services::{
    CurrencyService, GenerationService, PlacesService, TranslationService, WeatherService,
};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub weather: WeatherService,
    pub currency: CurrencyService,
    pub places: PlacesService,
    pub generation: GenerationService,
    pub translation: TranslationService,
}

// SPDX-License-Identifier: MIT

//! Application configuration loaded from environment variables.
//!
//! External API base URLs are configurable so tests can point the
//! adapters at local stub servers.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// SQLite connection string
    pub database_url: String,
    /// Frontend URL for CORS
    pub frontend_url: String,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,

    // --- External API credentials ---
    /// OpenWeather API key
    pub openweather_api_key: String,
    /// Maps/places API key
    pub maps_api_key: String,
    /// Generative AI API key
    pub genai_api_key: String,
    /// Generative AI model name
    pub genai_model: String,

    // --- External API base URLs (overridable for tests) ---
    pub openweather_base_url: String,
    pub openweather_geo_url: String,
    pub currency_base_url: String,
    pub maps_base_url: String,
    pub genai_base_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://wayfarer.db".to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),

            openweather_api_key: env::var("OPENWEATHER_API_KEY")
                .map_err(|_| ConfigError::Missing("OPENWEATHER_API_KEY"))?,
            maps_api_key: env::var("MAPS_API_KEY")
                .map_err(|_| ConfigError::Missing("MAPS_API_KEY"))?,
            genai_api_key: env::var("GENAI_API_KEY")
                .map_err(|_| ConfigError::Missing("GENAI_API_KEY"))?,
            genai_model: env::var("GENAI_MODEL").unwrap_or_else(|_| "gemini-pro".to_string()),

            openweather_base_url: env::var("OPENWEATHER_BASE_URL")
                .unwrap_or_else(|_| "https://api.openweathermap.org/data/2.5".to_string()),
            openweather_geo_url: env::var("OPENWEATHER_GEO_URL")
                .unwrap_or_else(|_| "https://api.openweathermap.org/geo/1.0".to_string()),
            currency_base_url: env::var("CURRENCY_BASE_URL")
                .unwrap_or_else(|_| "https://api.exchangerate-api.com/v4".to_string()),
            maps_base_url: env::var("MAPS_BASE_URL")
                .unwrap_or_else(|_| "https://maps.googleapis.com/maps/api".to_string()),
            genai_base_url: env::var("GENAI_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".to_string()),
        })
    }

    /// Default config for tests. Base URLs point at an unroutable host so
    /// any unstubbed external call fails fast instead of leaving the process.
    pub fn test_default() -> Self {
        Self {
            port: 5000,
            database_url: "sqlite::memory:".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            openweather_api_key: "test_weather_key".to_string(),
            maps_api_key: "test_maps_key".to_string(),
            genai_api_key: "test_genai_key".to_string(),
            genai_model: "gemini-pro".to_string(),
            openweather_base_url: "http://127.0.0.1:1/data/2.5".to_string(),
            openweather_geo_url: "http://127.0.0.1:1/geo/1.0".to_string(),
            currency_base_url: "http://127.0.0.1:1/v4".to_string(),
            maps_base_url: "http://127.0.0.1:1/maps/api".to_string(),
            genai_base_url: "http://127.0.0.1:1/v1beta".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

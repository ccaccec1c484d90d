// SPDX-License-Identifier: MIT

//! OpenWeather client: geocoding, current conditions, short forecast.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::config::Config;
use crate::error::AppError;
use crate::models::trip::{CurrentConditions, ForecastEntry, ResolvedLocation};
use crate::models::{Coordinates, WeatherReport};

const MAX_FORECAST_ENTRIES: usize = 10;

/// A location as given by the caller: either raw coordinates
/// ("48.86,2.35") or a name to geocode first.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Coordinates(Coordinates),
    Name(String),
}

impl LocationQuery {
    pub fn parse(raw: &str) -> Self {
        if let Some((lat, lng)) = raw.split_once(',') {
            if let (Ok(lat), Ok(lng)) = (lat.trim().parse(), lng.trim().parse()) {
                return LocationQuery::Coordinates(Coordinates { lat, lng });
            }
        }
        LocationQuery::Name(raw.trim().to_string())
    }
}

#[derive(Clone)]
pub struct WeatherService {
    http: reqwest::Client,
    base_url: String,
    geo_url: String,
    api_key: String,
}

// Raw OpenWeather reply shapes; only the fields we reshape.

#[derive(Deserialize)]
struct OwmCurrent {
    name: String,
    #[serde(default)]
    sys: OwmSys,
    main: OwmMain,
    #[serde(default)]
    weather: Vec<OwmCondition>,
    #[serde(default)]
    wind: OwmWind,
}

#[derive(Deserialize, Default)]
struct OwmSys {
    country: Option<String>,
}

#[derive(Deserialize)]
struct OwmMain {
    temp: f64,
    #[serde(default)]
    feels_like: f64,
    #[serde(default)]
    humidity: f64,
}

#[derive(Deserialize)]
struct OwmCondition {
    #[serde(default)]
    main: String,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize, Default)]
struct OwmWind {
    #[serde(default)]
    speed: f64,
}

#[derive(Deserialize)]
struct OwmForecast {
    #[serde(default)]
    list: Vec<OwmForecastEntry>,
}

#[derive(Deserialize)]
struct OwmForecastEntry {
    dt_txt: String,
    main: OwmMain,
    #[serde(default)]
    weather: Vec<OwmCondition>,
}

#[derive(Deserialize)]
struct OwmGeoResult {
    lat: f64,
    lon: f64,
}

impl WeatherService {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.openweather_base_url.clone(),
            geo_url: config.openweather_geo_url.clone(),
            api_key: config.openweather_api_key.clone(),
        }
    }

    /// Current conditions plus a short-range forecast for a location.
    /// Names are geocoded first. The optional date range is accepted for
    /// interface parity but the upstream API only serves the next days.
    pub async fn forecast(
        &self,
        location: LocationQuery,
        _start_date: Option<NaiveDate>,
        _end_date: Option<NaiveDate>,
    ) -> Result<WeatherReport, AppError> {
        let coordinates = match location {
            LocationQuery::Coordinates(c) => c,
            LocationQuery::Name(name) => self.geocode(&name).await?,
        };

        let current: OwmCurrent = self
            .get_json(&format!("{}/weather", self.base_url), coordinates)
            .await?;
        let forecast: OwmForecast = self
            .get_json(&format!("{}/forecast", self.base_url), coordinates)
            .await?;

        let conditions = current.weather.first();
        Ok(WeatherReport {
            current: CurrentConditions {
                temperature: current.main.temp,
                feels_like: current.main.feels_like,
                humidity: current.main.humidity,
                conditions: conditions.map(|c| c.main.clone()).unwrap_or_default(),
                description: conditions.map(|c| c.description.clone()).unwrap_or_default(),
                wind_speed: current.wind.speed,
            },
            forecast: forecast
                .list
                .into_iter()
                .take(MAX_FORECAST_ENTRIES)
                .map(|entry| ForecastEntry {
                    time: entry.dt_txt,
                    temperature: entry.main.temp,
                    description: entry
                        .weather
                        .first()
                        .map(|c| c.description.clone())
                        .unwrap_or_default(),
                })
                .collect(),
            location: ResolvedLocation {
                name: current.name,
                country: current.sys.country,
                coordinates,
            },
        })
    }

    /// Resolve a location name to coordinates.
    async fn geocode(&self, name: &str) -> Result<Coordinates, AppError> {
        let url = format!("{}/direct", self.geo_url);
        let response = self
            .http
            .get(&url)
            .query(&[("q", name), ("limit", "1"), ("appid", &self.api_key)])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Geocoding request failed");
                AppError::Upstream("Failed to fetch weather data".to_string())
            })?;

        let results: Vec<OwmGeoResult> = check_json(response).await?;

        results
            .first()
            .map(|r| Coordinates {
                lat: r.lat,
                lng: r.lon,
            })
            .ok_or_else(|| AppError::NotFound("Location not found".to_string()))
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        coordinates: Coordinates,
    ) -> Result<T, AppError> {
        let response = self
            .http
            .get(url)
            .query(&[
                ("lat", coordinates.lat.to_string()),
                ("lon", coordinates.lng.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Weather request failed");
                AppError::Upstream("Failed to fetch weather data".to_string())
            })?;

        check_json(response).await
    }
}

/// Check status and parse the JSON body, logging detail on failure.
async fn check_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::error!(%status, body, "Weather API returned an error");
        return Err(AppError::Upstream("Failed to fetch weather data".to_string()));
    }

    response.json().await.map_err(|e| {
        tracing::error!(error = %e, "Weather API reply was not valid JSON");
        AppError::Upstream("Failed to fetch weather data".to_string())
    })
}

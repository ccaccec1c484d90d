// SPDX-License-Identifier: MIT

//! Place search, place details, and address geocoding against the
//! Google Maps web service endpoints.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::AppError;
use crate::models::Coordinates;

const SEARCH_BIAS_RADIUS_METERS: u32 = 10_000;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceSummary {
    pub place_id: String,
    pub name: String,
    pub address: Option<String>,
    pub location: Option<Coordinates>,
    pub rating: Option<f64>,
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetails {
    pub place_id: String,
    pub name: String,
    pub address: Option<String>,
    pub location: Option<Coordinates>,
    pub rating: Option<f64>,
    pub phone_number: Option<String>,
    pub website: Option<String>,
    pub opening_hours: Vec<String>,
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodedAddress {
    pub place_id: String,
    pub formatted_address: String,
    pub location: Coordinates,
}

// Raw Google reply shapes.

#[derive(Deserialize)]
struct SearchReply {
    #[serde(default)]
    results: Vec<RawPlace>,
    status: String,
}

#[derive(Deserialize)]
struct DetailsReply {
    result: Option<RawPlace>,
    status: String,
}

#[derive(Deserialize)]
struct GeocodeReply {
    #[serde(default)]
    results: Vec<RawGeocodeResult>,
    status: String,
}

#[derive(Deserialize)]
struct RawPlace {
    #[serde(default)]
    place_id: String,
    #[serde(default)]
    name: String,
    formatted_address: Option<String>,
    #[serde(alias = "vicinity")]
    address: Option<String>,
    geometry: Option<RawGeometry>,
    rating: Option<f64>,
    formatted_phone_number: Option<String>,
    website: Option<String>,
    opening_hours: Option<RawOpeningHours>,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Deserialize)]
struct RawGeometry {
    location: RawLatLng,
}

#[derive(Deserialize)]
struct RawLatLng {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct RawOpeningHours {
    #[serde(default)]
    weekday_text: Vec<String>,
}

#[derive(Deserialize)]
struct RawGeocodeResult {
    #[serde(default)]
    place_id: String,
    formatted_address: String,
    geometry: RawGeometry,
}

impl RawPlace {
    fn address(&self) -> Option<String> {
        self.formatted_address.clone().or_else(|| self.address.clone())
    }

    fn location(&self) -> Option<Coordinates> {
        self.geometry.as_ref().map(|g| Coordinates {
            lat: g.location.lat,
            lng: g.location.lng,
        })
    }
}

#[derive(Clone)]
pub struct PlacesService {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl PlacesService {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.maps_base_url.clone(),
            api_key: config.maps_api_key.clone(),
        }
    }

    /// Free-text place search, optionally biased around coordinates.
    pub async fn search(
        &self,
        query: &str,
        near: Option<Coordinates>,
    ) -> Result<Vec<PlaceSummary>, AppError> {
        let url = format!("{}/place/textsearch/json", self.base_url);
        let mut params = vec![
            ("query".to_string(), query.to_string()),
            ("key".to_string(), self.api_key.clone()),
        ];
        if let Some(c) = near {
            params.push(("location".to_string(), format!("{},{}", c.lat, c.lng)));
            params.push(("radius".to_string(), SEARCH_BIAS_RADIUS_METERS.to_string()));
        }

        let reply: SearchReply = self.get_json(&url, &params).await?;
        check_status(&reply.status, "Place search")?;

        Ok(reply
            .results
            .into_iter()
            .map(|raw| PlaceSummary {
                address: raw.address(),
                location: raw.location(),
                place_id: raw.place_id,
                name: raw.name,
                rating: raw.rating,
                types: raw.types,
            })
            .collect())
    }

    /// Full details for a single place id.
    pub async fn place_details(&self, place_id: &str) -> Result<PlaceDetails, AppError> {
        let url = format!("{}/place/details/json", self.base_url);
        let params = vec![
            ("place_id".to_string(), place_id.to_string()),
            ("key".to_string(), self.api_key.clone()),
        ];

        let reply: DetailsReply = self.get_json(&url, &params).await?;
        check_status(&reply.status, "Place details")?;

        let raw = reply
            .result
            .ok_or_else(|| AppError::NotFound("Place not found".to_string()))?;

        Ok(PlaceDetails {
            address: raw.address(),
            location: raw.location(),
            opening_hours: raw
                .opening_hours
                .map(|h| h.weekday_text)
                .unwrap_or_default(),
            place_id: raw.place_id,
            name: raw.name,
            rating: raw.rating,
            phone_number: raw.formatted_phone_number,
            website: raw.website,
            types: raw.types,
        })
    }

    /// Resolve a street address to coordinates.
    pub async fn geocode(&self, address: &str) -> Result<GeocodedAddress, AppError> {
        let url = format!("{}/geocode/json", self.base_url);
        let params = vec![
            ("address".to_string(), address.to_string()),
            ("key".to_string(), self.api_key.clone()),
        ];

        let reply: GeocodeReply = self.get_json(&url, &params).await?;
        check_status(&reply.status, "Geocoding")?;

        reply
            .results
            .into_iter()
            .next()
            .map(|r| GeocodedAddress {
                place_id: r.place_id,
                formatted_address: r.formatted_address,
                location: Coordinates {
                    lat: r.geometry.location.lat,
                    lng: r.geometry.location.lng,
                },
            })
            .ok_or_else(|| AppError::NotFound("Address not found".to_string()))
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<T, AppError> {
        let response = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Places request failed");
                AppError::Upstream("Failed to fetch place data".to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!(%status, "Places API returned an error");
            return Err(AppError::Upstream("Failed to fetch place data".to_string()));
        }

        response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Places API reply was not valid JSON");
            AppError::Upstream("Failed to fetch place data".to_string())
        })
    }
}

/// Google signals failure through the body status field, not HTTP codes.
/// ZERO_RESULTS is a successful empty reply.
fn check_status(status: &str, operation: &str) -> Result<(), AppError> {
    match status {
        "OK" | "ZERO_RESULTS" => Ok(()),
        other => {
            tracing::error!(status = other, operation, "Places API rejected the request");
            Err(AppError::Upstream("Failed to fetch place data".to_string()))
        }
    }
}

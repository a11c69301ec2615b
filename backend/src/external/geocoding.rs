//! Geocoding API client
//!
//! Integrates with the OpenCage forward geocoding API to turn a city name
//! into coordinates.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use shared::GpsCoordinates;
use thiserror::Error;

use super::GeocodingProvider;

const DEFAULT_BASE_URL: &str = "https://api.opencagedata.com/geocode/v1";

/// Failures reported by the geocoding collaborator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeocodingError {
    #[error("no location found for {0:?}")]
    NotFound(String),

    #[error("geocoding service unavailable: {0}")]
    Unavailable(String),

    #[error("unexpected geocoding response: {0}")]
    InvalidResponse(String),
}

/// OpenCage API client
#[derive(Clone)]
pub struct GeocodingClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// OpenCage API response
#[derive(Debug, Deserialize)]
struct OpenCageResponse {
    #[serde(default)]
    results: Vec<OpenCageResult>,
}

#[derive(Debug, Deserialize)]
struct OpenCageResult {
    geometry: OpenCageGeometry,
    formatted: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenCageGeometry {
    lat: f64,
    lng: f64,
}

impl GeocodingClient {
    /// Create a new GeocodingClient
    pub fn new(api_key: String, timeout: Duration) -> reqwest::Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string(), timeout)
    }

    /// Create a new GeocodingClient with custom base URL (for testing)
    pub fn with_base_url(
        api_key: String,
        base_url: String,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            base_url,
        })
    }

    /// Look up the best match for a place name
    pub async fn forward(&self, place: &str) -> Result<GpsCoordinates, GeocodingError> {
        let url = format!("{}/json", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", place),
                ("key", self.api_key.as_str()),
                ("limit", "1"),
                ("no_annotations", "1"),
            ])
            .send()
            .await
            // The URL carries the API key
            .map_err(|e| GeocodingError::Unavailable(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodingError::Unavailable(format!(
                "geocoding API returned {}",
                status
            )));
        }

        let data: OpenCageResponse = response
            .json()
            .await
            .map_err(|e| GeocodingError::InvalidResponse(e.without_url().to_string()))?;

        first_match(data, place)
    }
}

#[axum::async_trait]
impl GeocodingProvider for GeocodingClient {
    async fn geocode(&self, place: &str) -> Result<GpsCoordinates, GeocodingError> {
        self.forward(place).await
    }
}

/// Take the top-ranked result, rejecting coordinates outside WGS84 ranges
fn first_match(data: OpenCageResponse, place: &str) -> Result<GpsCoordinates, GeocodingError> {
    let result = data
        .results
        .into_iter()
        .next()
        .ok_or_else(|| GeocodingError::NotFound(place.to_string()))?;

    tracing::debug!(
        "Geocoded {:?} to {:?} ({}, {})",
        place,
        result.formatted.as_deref().unwrap_or(place),
        result.geometry.lat,
        result.geometry.lng
    );

    GpsCoordinates::try_new(result.geometry.lat, result.geometry.lng)
        .map_err(|e| GeocodingError::InvalidResponse(e.to_string()))
}

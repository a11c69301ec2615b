//! External API integrations
//!
//! The prediction service only sees the two provider traits; the OpenCage and
//! OpenWeatherMap clients are the production implementations.

pub mod geocoding;
pub mod weather;

use chrono::NaiveDate;
use shared::{GpsCoordinates, WeatherConditions};

pub use geocoding::{GeocodingClient, GeocodingError};
pub use weather::{WeatherClient, WeatherError};

/// Resolves a place name to coordinates
#[axum::async_trait]
pub trait GeocodingProvider: Send + Sync {
    async fn geocode(&self, place: &str) -> Result<GpsCoordinates, GeocodingError>;
}

/// Supplies rainfall and temperature readings for a location and date
#[axum::async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn conditions(
        &self,
        location: GpsCoordinates,
        date: NaiveDate,
    ) -> Result<WeatherConditions, WeatherError>;
}

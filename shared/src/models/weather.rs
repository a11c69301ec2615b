//! Weather data models

use serde::{Deserialize, Serialize};

use crate::validation::{validate_finite, validate_non_negative, ValidationError};

/// Rainfall and temperature readings for a location and date
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WeatherConditions {
    /// Accumulated rainfall over the 24 hours from the target slot
    #[serde(rename = "rainfall_24h")]
    pub rainfall_24h_mm: f64,
    /// Accumulated rainfall over the 72 hours from the target slot
    #[serde(rename = "rainfall_72h")]
    pub rainfall_72h_mm: f64,
    #[serde(rename = "temperature")]
    pub temperature_celsius: f64,
}

impl WeatherConditions {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_non_negative("rainfall_24h", self.rainfall_24h_mm)?;
        validate_non_negative("rainfall_72h", self.rainfall_72h_mm)?;
        validate_finite("temperature", self.temperature_celsius)?;
        Ok(())
    }
}

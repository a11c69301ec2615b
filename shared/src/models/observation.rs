//! Observation models: the evaluator's input

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::WeatherConditions;
use crate::types::GpsCoordinates;
use crate::validation::{
    validate_count_value, validate_non_negative, validate_percentage, ValidationError,
};

/// Site readings entered by the user on the prediction form
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SiteConditions {
    pub soil_moisture_percent: f64,
    pub river_level_m: f64,
    pub reservoir_level_percent: f64,
    /// Number of floods recorded at the site during the last month
    pub previous_floods_last_month: i32,
}

impl SiteConditions {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_percentage("soil_moisture", self.soil_moisture_percent)?;
        validate_non_negative("river_level", self.river_level_m)?;
        validate_percentage("reservoir_level", self.reservoir_level_percent)?;
        validate_count_value("previous_floods", self.previous_floods_last_month)?;
        Ok(())
    }
}

/// Snapshot of every input for one prediction request
///
/// Built once per request from the user's site readings, the geocoded
/// location and the weather provider's readings, then handed to
/// `ScoringModel::evaluate`. The date is carried for display only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Observation {
    pub location: GpsCoordinates,
    pub date: NaiveDate,
    pub soil_moisture_percent: f64,
    pub river_level_m: f64,
    pub reservoir_level_percent: f64,
    pub previous_floods_last_month: i32,
    pub rainfall_24h_mm: f64,
    pub rainfall_72h_mm: f64,
    pub temperature_celsius: f64,
}

impl Observation {
    pub fn new(
        location: GpsCoordinates,
        date: NaiveDate,
        site: SiteConditions,
        weather: WeatherConditions,
    ) -> Self {
        Self {
            location,
            date,
            soil_moisture_percent: site.soil_moisture_percent,
            river_level_m: site.river_level_m,
            reservoir_level_percent: site.reservoir_level_percent,
            previous_floods_last_month: site.previous_floods_last_month,
            rainfall_24h_mm: weather.rainfall_24h_mm,
            rainfall_72h_mm: weather.rainfall_72h_mm,
            temperature_celsius: weather.temperature_celsius,
        }
    }

    pub fn site(&self) -> SiteConditions {
        SiteConditions {
            soil_moisture_percent: self.soil_moisture_percent,
            river_level_m: self.river_level_m,
            reservoir_level_percent: self.reservoir_level_percent,
            previous_floods_last_month: self.previous_floods_last_month,
        }
    }

    pub fn weather(&self) -> WeatherConditions {
        WeatherConditions {
            rainfall_24h_mm: self.rainfall_24h_mm,
            rainfall_72h_mm: self.rainfall_72h_mm,
            temperature_celsius: self.temperature_celsius,
        }
    }

    /// Check every field against its range invariant
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.location.validate()?;
        self.site().validate()?;
        self.weather().validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation() -> Observation {
        Observation::new(
            GpsCoordinates::new(40.69, -89.59),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            SiteConditions {
                soil_moisture_percent: 55.0,
                river_level_m: 2.1,
                reservoir_level_percent: 70.0,
                previous_floods_last_month: 1,
            },
            WeatherConditions {
                rainfall_24h_mm: 20.0,
                rainfall_72h_mm: 45.0,
                temperature_celsius: 18.0,
            },
        )
    }

    #[test]
    fn test_valid_observation() {
        assert!(observation().validate().is_ok());
    }

    #[test]
    fn test_split_round_trips_parts() {
        let obs = observation();
        let rebuilt = Observation::new(obs.location, obs.date, obs.site(), obs.weather());
        assert_eq!(rebuilt, obs);
    }

    #[test]
    fn test_soil_moisture_out_of_range() {
        let mut obs = observation();
        obs.soil_moisture_percent = 101.0;
        assert_eq!(obs.validate().unwrap_err().field(), "soil_moisture");
        obs.soil_moisture_percent = -1.0;
        assert_eq!(obs.validate().unwrap_err().field(), "soil_moisture");
    }

    #[test]
    fn test_negative_previous_floods() {
        let mut obs = observation();
        obs.previous_floods_last_month = -1;
        assert_eq!(obs.validate().unwrap_err().field(), "previous_floods");
    }

    #[test]
    fn test_invalid_location() {
        let mut obs = observation();
        obs.location.latitude = 120.0;
        assert_eq!(obs.validate().unwrap_err().field(), "latitude");
    }
}

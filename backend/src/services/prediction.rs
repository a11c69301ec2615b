//! Flood prediction service
//!
//! Validates the submitted form, resolves the city through the geocoding
//! provider, pulls weather readings, and runs the scoring model.

use std::sync::Arc;

use anyhow::anyhow;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use shared::{
    parse_date, validate_count, validate_non_negative, validate_percentage, validate_place_name,
    GpsCoordinates, Observation, RiskAssessment, RiskTier, ScoringModel, SiteConditions,
    ValidationError, WeatherConditions,
};

use crate::error::{AppError, AppResult};
use crate::external::{GeocodingError, GeocodingProvider, WeatherError, WeatherProvider};
use crate::AppState;

/// A number submitted either as JSON number or as text
///
/// HTML number inputs are posted as strings, so both forms are accepted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
}

impl NumericInput {
    pub fn parse(&self, field: &'static str) -> Result<f64, ValidationError> {
        match self {
            NumericInput::Number(value) => Ok(*value),
            NumericInput::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(ValidationError::Missing { field });
                }
                trimmed
                    .parse::<f64>()
                    .map_err(|_| ValidationError::NotANumber {
                        field,
                        value: text.clone(),
                    })
            }
        }
    }
}

impl From<f64> for NumericInput {
    fn from(value: f64) -> Self {
        NumericInput::Number(value)
    }
}

/// Prediction form as posted by the web client
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRequest {
    pub city: Option<String>,
    /// Calendar date, YYYY-MM-DD
    pub date: Option<String>,
    pub soil_moisture: Option<NumericInput>,
    pub river_level: Option<NumericInput>,
    pub reservoir_level: Option<NumericInput>,
    pub previous_floods: Option<NumericInput>,
}

/// A prediction request whose user-supplied fields passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub city: String,
    pub date: NaiveDate,
    pub site: SiteConditions,
}

fn required<'a, T>(field: &'static str, value: &'a Option<T>) -> Result<&'a T, ValidationError> {
    value.as_ref().ok_or(ValidationError::Missing { field })
}

impl PredictionRequest {
    /// Check every submitted field before any collaborator is called
    pub fn validate(&self) -> Result<ValidatedRequest, ValidationError> {
        let city = validate_place_name("city", required("city", &self.city)?)?;
        let date = parse_date("date", required("date", &self.date)?)?;

        let soil_moisture = required("soil_moisture", &self.soil_moisture)?.parse("soil_moisture")?;
        let river_level = required("river_level", &self.river_level)?.parse("river_level")?;
        let reservoir_level =
            required("reservoir_level", &self.reservoir_level)?.parse("reservoir_level")?;
        let previous_floods =
            required("previous_floods", &self.previous_floods)?.parse("previous_floods")?;

        let site = SiteConditions {
            soil_moisture_percent: validate_percentage("soil_moisture", soil_moisture)?,
            river_level_m: validate_non_negative("river_level", river_level)?,
            reservoir_level_percent: validate_percentage("reservoir_level", reservoir_level)?,
            previous_floods_last_month: validate_count("previous_floods", previous_floods)?,
        };

        Ok(ValidatedRequest { city, date, site })
    }
}

/// Prediction returned to the web client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionResponse {
    #[serde(flatten)]
    pub assessment: RiskAssessment,
    pub risk_tier: RiskTier,
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl From<RiskAssessment> for PredictionResponse {
    fn from(assessment: RiskAssessment) -> Self {
        Self {
            risk_tier: assessment.risk_tier(),
            year: assessment.date.year(),
            month: assessment.date.month(),
            day: assessment.date.day(),
            assessment,
        }
    }
}

/// Flood prediction service
#[derive(Clone)]
pub struct PredictionService {
    geocoder: Arc<dyn GeocodingProvider>,
    weather: Arc<dyn WeatherProvider>,
    model: Arc<ScoringModel>,
}

impl PredictionService {
    pub fn new(
        geocoder: Arc<dyn GeocodingProvider>,
        weather: Arc<dyn WeatherProvider>,
        model: Arc<ScoringModel>,
    ) -> Self {
        Self {
            geocoder,
            weather,
            model,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.geocoder.clone(),
            state.weather.clone(),
            state.scoring.clone(),
        )
    }

    /// Resolve a city name to coordinates
    pub async fn locate(&self, city: &str) -> AppResult<GpsCoordinates> {
        let location = self
            .geocoder
            .geocode(city)
            .await
            .and_then(|l| {
                l.validate()
                    .map(|_| l)
                    .map_err(|e| GeocodingError::InvalidResponse(e.to_string()))
            })
            .map_err(|e| {
                tracing::warn!("Geocoding failed for {:?}: {}", city, e);
                e
            })?;
        Ok(location)
    }

    /// Fetch rainfall and temperature for a location and date
    pub async fn conditions(
        &self,
        location: GpsCoordinates,
        date: NaiveDate,
    ) -> AppResult<WeatherConditions> {
        let conditions = self
            .weather
            .conditions(location, date)
            .await
            .and_then(|c| {
                c.validate()
                    .map(|_| c)
                    .map_err(|e| WeatherError::InvalidResponse(e.to_string()))
            })
            .map_err(|e| {
                tracing::warn!("Weather lookup failed for {} on {}: {}", location, date, e);
                e
            })?;
        Ok(conditions)
    }

    /// Run a full prediction for a submitted form
    pub async fn predict(&self, request: PredictionRequest) -> AppResult<PredictionResponse> {
        let request = request.validate()?;
        tracing::info!("Predicting flood risk for {:?} on {}", request.city, request.date);

        let location = self.locate(&request.city).await?;
        let weather = self.conditions(location, request.date).await?;

        let observation = Observation::new(location, request.date, request.site, weather);
        let response = PredictionResponse::from(self.assess(&observation)?);

        tracing::info!(
            "Flood risk for {:?} ({}): {}% ({}), predicted={}",
            request.city,
            location,
            response.assessment.flood_probability_percent,
            response.risk_tier,
            response.assessment.flood_predicted
        );

        Ok(response)
    }

    /// Score an observation assembled from already-checked parts
    ///
    /// The form, the coordinates and the weather readings are all validated
    /// before this point, so a rejection here is a server fault.
    pub fn assess(&self, observation: &Observation) -> AppResult<RiskAssessment> {
        self.model.evaluate(observation).map_err(|e| {
            AppError::InternalError(anyhow!(e).context("assembled observation failed validation"))
        })
    }
}

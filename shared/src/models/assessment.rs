//! Risk assessment models: the evaluator's output and its display tiers

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Observation;

/// Probabilities strictly below this are `RiskTier::Low`
pub const MEDIUM_TIER_FLOOR: f64 = 35.0;

/// Probabilities strictly above this are `RiskTier::High`
pub const HIGH_TIER_FLOOR: f64 = 70.0;

/// Result of evaluating one observation
///
/// Field names follow the JSON contract the web form reads, so the struct
/// serializes straight into the prediction response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskAssessment {
    #[serde(rename = "flood_prediction")]
    pub flood_predicted: bool,
    /// Probability of flooding as a percentage in [0, 100]
    #[serde(rename = "flood_probability")]
    pub flood_probability_percent: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub date: NaiveDate,
    pub soil_moisture: f64,
    pub river_level: f64,
    pub reservoir_level: f64,
    pub previous_floods: i32,
    pub rainfall_24h: f64,
    pub rainfall_72h: f64,
    pub temperature: f64,
}

impl RiskAssessment {
    /// Pair a computed probability with the observation it came from
    pub fn from_observation(
        observation: &Observation,
        flood_probability_percent: f64,
        flood_predicted: bool,
    ) -> Self {
        Self {
            flood_predicted,
            flood_probability_percent,
            latitude: observation.location.latitude,
            longitude: observation.location.longitude,
            date: observation.date,
            soil_moisture: observation.soil_moisture_percent,
            river_level: observation.river_level_m,
            reservoir_level: observation.reservoir_level_percent,
            previous_floods: observation.previous_floods_last_month,
            rainfall_24h: observation.rainfall_24h_mm,
            rainfall_72h: observation.rainfall_72h_mm,
            temperature: observation.temperature_celsius,
        }
    }

    pub fn risk_tier(&self) -> RiskTier {
        classify_risk_tier(self.flood_probability_percent)
    }
}

/// Display tier for a flood probability
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    /// Below 35%
    Low,
    /// 35% to 70% inclusive
    Medium,
    /// Above 70%
    High,
}

impl RiskTier {
    /// Map marker colour used by the web form
    pub fn color(&self) -> &'static str {
        match self {
            RiskTier::Low => "#4CAF50",
            RiskTier::Medium => "#FF9800",
            RiskTier::High => "#F44336",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            RiskTier::Low => "LOW",
            RiskTier::Medium => "MEDIUM",
            RiskTier::High => "HIGH",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskTier::Low => write!(f, "Low Risk"),
            RiskTier::Medium => write!(f, "Medium Risk"),
            RiskTier::High => write!(f, "High Risk"),
        }
    }
}

/// Classify a probability percentage into a display tier
///
/// Both 35 and 70 belong to `Medium`. A NaN probability never comes out of the
/// evaluator; if one is passed anyway it falls through to `High`.
pub fn classify_risk_tier(probability_percent: f64) -> RiskTier {
    if probability_percent < MEDIUM_TIER_FLOOR {
        RiskTier::Low
    } else if probability_percent <= HIGH_TIER_FLOOR {
        RiskTier::Medium
    } else {
        RiskTier::High
    }
}

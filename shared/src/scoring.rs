//! Flood risk scoring
//!
//! Each contributing factor is a weighted linear ramp: zero below its onset,
//! its full weight at or above its saturation point. The probability is the
//! sum of the contributions, capped at 1 and expressed as a percentage. Every
//! ramp is non-decreasing and the weights are non-negative, so raising any
//! single factor can never lower the result.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Observation, RiskAssessment};
use crate::validation::ValidationError;

/// Default probability above which a flood is predicted
pub const DEFAULT_PREDICTION_THRESHOLD_PERCENT: f64 = 50.0;

/// Default river stage (m) at which the river factor saturates
pub const DEFAULT_RIVER_FLOOD_STAGE_M: f64 = 3.5;

/// An invalid scoring model configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("weight for {factor} must be a finite non-negative number, got {weight}")]
    InvalidWeight { factor: &'static str, weight: f64 },

    #[error("onset ({onset}) for {factor} must be finite and below its saturation ({saturation})")]
    InvalidRamp {
        factor: &'static str,
        onset: f64,
        saturation: f64,
    },

    #[error("river flood stage must be positive, got {0}")]
    InvalidFloodStage(f64),

    #[error("prediction threshold must be between 0 and 100, got {0}")]
    InvalidThreshold(f64),
}

/// One weighted contribution to the flood probability
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RiskFactor {
    /// Share of the probability (0-1) this factor adds once saturated
    pub weight: f64,
    /// Value at which the factor starts contributing
    pub onset: f64,
    /// Value at which the factor contributes its full weight
    pub saturation: f64,
}

impl RiskFactor {
    pub const fn new(weight: f64, onset: f64, saturation: f64) -> Self {
        Self {
            weight,
            onset,
            saturation,
        }
    }

    /// Contribution of `value`, in `[0, weight]`
    pub fn contribution(&self, value: f64) -> f64 {
        let progress = (value - self.onset) / (self.saturation - self.onset);
        self.weight * progress.clamp(0.0, 1.0)
    }

    fn validate(&self, factor: &'static str) -> Result<(), ModelError> {
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(ModelError::InvalidWeight {
                factor,
                weight: self.weight,
            });
        }
        if !self.onset.is_finite() || !self.saturation.is_finite() || self.onset >= self.saturation
        {
            return Err(ModelError::InvalidRamp {
                factor,
                onset: self.onset,
                saturation: self.saturation,
            });
        }
        Ok(())
    }
}

/// Per-factor contributions for one observation, before capping
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct FactorBreakdown {
    pub rainfall_24h: f64,
    pub rainfall_72h: f64,
    pub river_level: f64,
    pub soil_moisture: f64,
    pub reservoir_level: f64,
    pub previous_floods: f64,
}

impl FactorBreakdown {
    pub fn total(&self) -> f64 {
        self.rainfall_24h
            + self.rainfall_72h
            + self.river_level
            + self.soil_moisture
            + self.reservoir_level
            + self.previous_floods
    }
}

/// Deterministic flood risk model
///
/// The defaults mirror the factor bands used to label the historical training
/// data: heavy 24h/72h rain dominates, followed by river stage, reservoir
/// fullness, soil saturation and recent floods.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringModel {
    /// Rainfall over the last 24 hours, mm
    pub rainfall_24h: RiskFactor,
    /// Rainfall over the last 72 hours, mm
    pub rainfall_72h: RiskFactor,
    /// River level as a fraction of `river_flood_stage_m`
    pub river_level: RiskFactor,
    /// Soil moisture, percent
    pub soil_moisture: RiskFactor,
    /// Reservoir level, percent of capacity
    pub reservoir_level: RiskFactor,
    /// Floods recorded during the last month
    pub previous_floods: RiskFactor,
    pub river_flood_stage_m: f64,
    /// A flood is predicted when the probability is strictly above this
    pub prediction_threshold_percent: f64,
}

impl Default for ScoringModel {
    fn default() -> Self {
        Self {
            rainfall_24h: RiskFactor::new(0.40, 25.0, 100.0),
            rainfall_72h: RiskFactor::new(0.40, 60.0, 200.0),
            river_level: RiskFactor::new(0.30, 0.5, 1.0),
            soil_moisture: RiskFactor::new(0.15, 50.0, 90.0),
            reservoir_level: RiskFactor::new(0.20, 60.0, 95.0),
            previous_floods: RiskFactor::new(0.15, 0.0, 2.0),
            river_flood_stage_m: DEFAULT_RIVER_FLOOD_STAGE_M,
            prediction_threshold_percent: DEFAULT_PREDICTION_THRESHOLD_PERCENT,
        }
    }
}

impl ScoringModel {
    /// Default model with a different prediction threshold
    pub fn with_threshold(prediction_threshold_percent: f64) -> Self {
        Self {
            prediction_threshold_percent,
            ..Self::default()
        }
    }

    /// Reject configurations that would break the probability bounds or
    /// monotonicity
    pub fn validate(&self) -> Result<(), ModelError> {
        self.rainfall_24h.validate("rainfall_24h")?;
        self.rainfall_72h.validate("rainfall_72h")?;
        self.river_level.validate("river_level")?;
        self.soil_moisture.validate("soil_moisture")?;
        self.reservoir_level.validate("reservoir_level")?;
        self.previous_floods.validate("previous_floods")?;

        if !self.river_flood_stage_m.is_finite() || self.river_flood_stage_m <= 0.0 {
            return Err(ModelError::InvalidFloodStage(self.river_flood_stage_m));
        }
        if !(0.0..=100.0).contains(&self.prediction_threshold_percent) {
            return Err(ModelError::InvalidThreshold(
                self.prediction_threshold_percent,
            ));
        }
        Ok(())
    }

    /// Contribution of each factor for an observation
    pub fn breakdown(&self, observation: &Observation) -> FactorBreakdown {
        FactorBreakdown {
            rainfall_24h: self.rainfall_24h.contribution(observation.rainfall_24h_mm),
            rainfall_72h: self.rainfall_72h.contribution(observation.rainfall_72h_mm),
            river_level: self
                .river_level
                .contribution(observation.river_level_m / self.river_flood_stage_m),
            soil_moisture: self
                .soil_moisture
                .contribution(observation.soil_moisture_percent),
            reservoir_level: self
                .reservoir_level
                .contribution(observation.reservoir_level_percent),
            previous_floods: self
                .previous_floods
                .contribution(f64::from(observation.previous_floods_last_month)),
        }
    }

    /// Flood probability as a percentage, rounded to two decimals
    pub fn probability(&self, observation: &Observation) -> f64 {
        let score = self.breakdown(observation).total().clamp(0.0, 1.0);
        round_percent(score * 100.0)
    }

    /// Evaluate an observation
    ///
    /// Fails with the first field that violates its range invariant; no
    /// partial assessment is produced.
    pub fn evaluate(&self, observation: &Observation) -> Result<RiskAssessment, ValidationError> {
        observation.validate()?;

        let probability = self.probability(observation);
        let predicted = probability > self.prediction_threshold_percent;

        Ok(RiskAssessment::from_observation(
            observation,
            probability,
            predicted,
        ))
    }
}

/// Evaluate with the default model
pub fn evaluate(observation: &Observation) -> Result<RiskAssessment, ValidationError> {
    ScoringModel::default().evaluate(observation)
}

fn round_percent(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

//! Business logic services for the flood risk prediction service

pub mod prediction;

pub use prediction::{NumericInput, PredictionRequest, PredictionResponse, PredictionService};

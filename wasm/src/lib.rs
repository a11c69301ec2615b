//! WebAssembly module for the flood risk prediction form
//!
//! Provides client-side computation for:
//! - Risk tier and map colour for a probability
//! - Form field validation before submission
//! - Offline flood risk evaluation with the default scoring model

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::scoring::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Classify a flood probability into its display tier code
#[wasm_bindgen]
pub fn classify_flood_risk_tier(probability_percent: f64) -> String {
    classify_risk_tier(probability_percent).code().to_string()
}

/// Map marker colour for a flood probability
#[wasm_bindgen]
pub fn risk_tier_color(probability_percent: f64) -> String {
    classify_risk_tier(probability_percent).color().to_string()
}

/// Check a soil moisture or reservoir reading entered on the form
#[wasm_bindgen]
pub fn is_valid_percentage(value: f64) -> bool {
    validate_percentage("value", value).is_ok()
}

/// Check a previous-floods count entered on the form
#[wasm_bindgen]
pub fn is_valid_flood_count(value: f64) -> bool {
    validate_count("previous_floods", value).is_ok()
}

/// Evaluate an observation (JSON) and return the assessment as JSON
#[wasm_bindgen]
pub fn evaluate_observation(observation_json: &str) -> Result<String, JsValue> {
    evaluate_json(&ScoringModel::default(), observation_json).map_err(|e| JsValue::from_str(&e))
}

/// Evaluate an observation (JSON) against a custom prediction threshold
#[wasm_bindgen]
pub fn evaluate_observation_with_threshold(
    observation_json: &str,
    threshold_percent: f64,
) -> Result<String, JsValue> {
    evaluate_with_threshold_json(observation_json, threshold_percent)
        .map_err(|e| JsValue::from_str(&e))
}

fn evaluate_with_threshold_json(
    observation_json: &str,
    threshold_percent: f64,
) -> Result<String, String> {
    let model = ScoringModel::with_threshold(threshold_percent);
    model.validate().map_err(|e| e.to_string())?;
    evaluate_json(&model, observation_json)
}

fn evaluate_json(model: &ScoringModel, observation_json: &str) -> Result<String, String> {
    let observation: Observation = serde_json::from_str(observation_json)
        .map_err(|e| format!("Invalid observation JSON: {}", e))?;

    let assessment = model.evaluate(&observation).map_err(|e| e.to_string())?;
    serde_json::to_string(&assessment).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_flood_risk_tier() {
        assert_eq!(classify_flood_risk_tier(10.0), "LOW");
        assert_eq!(classify_flood_risk_tier(35.0), "MEDIUM");
        assert_eq!(classify_flood_risk_tier(70.0), "MEDIUM");
        assert_eq!(classify_flood_risk_tier(85.5), "HIGH");
    }

    #[test]
    fn test_risk_tier_color() {
        assert_eq!(risk_tier_color(0.0), "#4CAF50");
        assert_eq!(risk_tier_color(50.0), "#FF9800");
        assert_eq!(risk_tier_color(100.0), "#F44336");
    }

    #[test]
    fn test_form_validation() {
        assert!(is_valid_percentage(0.0));
        assert!(is_valid_percentage(100.0));
        assert!(!is_valid_percentage(100.5));
        assert!(!is_valid_percentage(f64::NAN));

        assert!(is_valid_flood_count(2.0));
        assert!(!is_valid_flood_count(-1.0));
        assert!(!is_valid_flood_count(1.5));
    }

    const MODERATE: &str = r#"{
        "location": {"latitude": 40.6936, "longitude": -89.589},
        "date": "2024-05-01",
        "soil_moisture_percent": 70.0,
        "river_level_m": 2.625,
        "reservoir_level_percent": 80.0,
        "previous_floods_last_month": 0,
        "rainfall_24h_mm": 50.0,
        "rainfall_72h_mm": 120.0,
        "temperature_celsius": 18.0
    }"#;

    fn predicted(output: &str) -> bool {
        let value: serde_json::Value = serde_json::from_str(output).unwrap();
        value["flood_prediction"].as_bool().unwrap()
    }

    #[test]
    fn test_evaluate_with_threshold() {
        // Moderate conditions score 64.4%
        assert!(predicted(&evaluate_with_threshold_json(MODERATE, 60.0).unwrap()));
        assert!(!predicted(&evaluate_with_threshold_json(MODERATE, 70.0).unwrap()));
        assert!(evaluate_with_threshold_json(MODERATE, 150.0).is_err());
    }

    #[test]
    fn test_evaluate_json() {
        let json = r#"{
            "location": {"latitude": 40.6936, "longitude": -89.589},
            "date": "2024-05-01",
            "soil_moisture_percent": 90.0,
            "river_level_m": 5.0,
            "reservoir_level_percent": 95.0,
            "previous_floods_last_month": 3,
            "rainfall_24h_mm": 150.0,
            "rainfall_72h_mm": 300.0,
            "temperature_celsius": 25.0
        }"#;

        let output = evaluate_json(&ScoringModel::default(), json).unwrap();
        let output: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(output["flood_prediction"], true);
        assert_eq!(output["date"], "2024-05-01");
    }

    #[test]
    fn test_evaluate_json_rejects_invalid_observation() {
        let json = r#"{
            "location": {"latitude": 40.6936, "longitude": -89.589},
            "date": "2024-05-01",
            "soil_moisture_percent": 120.0,
            "river_level_m": 5.0,
            "reservoir_level_percent": 95.0,
            "previous_floods_last_month": 3,
            "rainfall_24h_mm": 150.0,
            "rainfall_72h_mm": 300.0,
            "temperature_celsius": 25.0
        }"#;

        let model = ScoringModel::default();
        let err = evaluate_json(&model, json).unwrap_err();
        assert!(err.contains("soil_moisture"));
        assert!(evaluate_json(&model, "not json").is_err());
    }
}

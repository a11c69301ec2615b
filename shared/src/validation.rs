//! Validation utilities for flood risk observations
//!
//! Every field that reaches the evaluator goes through one of these checks,
//! both when a request is parsed and again inside `ScoringModel::evaluate`.

use chrono::NaiveDate;
use thiserror::Error;

/// Lowest accepted value for a percentage field
pub const PERCENT_MIN: f64 = 0.0;

/// Highest accepted value for a percentage field
pub const PERCENT_MAX: f64 = 100.0;

/// Date format accepted from the web form
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A field that violates its range invariant
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} must be a number, got {value:?}")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} cannot be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be a whole number, got {value}")]
    NotAnInteger { field: &'static str, value: f64 },

    #[error("{field} must be a date in YYYY-MM-DD format, got {value:?}")]
    InvalidDate { field: &'static str, value: String },
}

impl ValidationError {
    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Missing { field }
            | ValidationError::NotANumber { field, .. }
            | ValidationError::NotFinite { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::Negative { field, .. }
            | ValidationError::NotAnInteger { field, .. }
            | ValidationError::InvalidDate { field, .. } => field,
        }
    }
}

/// Validate that a value is a finite real number
pub fn validate_finite(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NotFinite { field })
    }
}

/// Validate that a value lies in the closed range `[min, max]`
pub fn validate_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<f64, ValidationError> {
    validate_finite(field, value)?;
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

/// Validate a percentage field (0-100 inclusive)
pub fn validate_percentage(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    validate_range(field, value, PERCENT_MIN, PERCENT_MAX)
}

/// Validate a non-negative measurement such as river level or rainfall
pub fn validate_non_negative(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    validate_finite(field, value)?;
    if value < 0.0 {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(value)
}

/// Validate a non-negative whole count
///
/// Accepts a float because the web form posts counts as free text; `2.0` is
/// fine, `2.5` is not.
pub fn validate_count(field: &'static str, value: f64) -> Result<i32, ValidationError> {
    validate_non_negative(field, value)?;
    if value.fract() != 0.0 {
        return Err(ValidationError::NotAnInteger { field, value });
    }
    if value > f64::from(i32::MAX) {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min: 0.0,
            max: f64::from(i32::MAX),
        });
    }
    Ok(value as i32)
}

/// Validate an integer count that is already typed
pub fn validate_count_value(field: &'static str, value: i32) -> Result<i32, ValidationError> {
    if value < 0 {
        return Err(ValidationError::Negative {
            field,
            value: f64::from(value),
        });
    }
    Ok(value)
}

/// Validate latitude in degrees
pub fn validate_latitude(value: f64) -> Result<f64, ValidationError> {
    validate_range("latitude", value, -90.0, 90.0)
}

/// Validate longitude in degrees
pub fn validate_longitude(value: f64) -> Result<f64, ValidationError> {
    validate_range("longitude", value, -180.0, 180.0)
}

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Missing { field });
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// Validate a free-text place name
pub fn validate_place_name(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Missing { field });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_accepts_bounds() {
        assert_eq!(validate_percentage("soil_moisture", 0.0), Ok(0.0));
        assert_eq!(validate_percentage("soil_moisture", 100.0), Ok(100.0));
        assert_eq!(validate_percentage("soil_moisture", 42.5), Ok(42.5));
    }

    #[test]
    fn test_percentage_rejects_out_of_range() {
        assert!(matches!(
            validate_percentage("soil_moisture", -1.0),
            Err(ValidationError::OutOfRange { field: "soil_moisture", .. })
        ));
        assert!(matches!(
            validate_percentage("soil_moisture", 101.0),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        assert_eq!(
            validate_non_negative("river_level", f64::NAN),
            Err(ValidationError::NotFinite { field: "river_level" })
        );
        assert!(validate_percentage("reservoir_level", f64::INFINITY).is_err());
    }

    #[test]
    fn test_non_negative() {
        assert_eq!(validate_non_negative("rainfall_24h", 0.0), Ok(0.0));
        assert_eq!(
            validate_non_negative("rainfall_24h", -0.5),
            Err(ValidationError::Negative {
                field: "rainfall_24h",
                value: -0.5
            })
        );
    }

    #[test]
    fn test_count() {
        assert_eq!(validate_count("previous_floods", 3.0), Ok(3));
        assert!(matches!(
            validate_count("previous_floods", -1.0),
            Err(ValidationError::Negative { .. })
        ));
        assert!(matches!(
            validate_count("previous_floods", 1.5),
            Err(ValidationError::NotAnInteger { .. })
        ));
        assert!(validate_count_value("previous_floods", -1).is_err());
        assert_eq!(validate_count_value("previous_floods", 0), Ok(0));
    }

    #[test]
    fn test_coordinates() {
        assert!(validate_latitude(90.0).is_ok());
        assert!(validate_latitude(-90.5).is_err());
        assert!(validate_longitude(-180.0).is_ok());
        assert!(validate_longitude(180.1).is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("date", "2024-05-01"),
            Ok(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
        );
        assert_eq!(
            parse_date("date", "  "),
            Err(ValidationError::Missing { field: "date" })
        );
        assert!(matches!(
            parse_date("date", "01/05/2024"),
            Err(ValidationError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_place_name_trimmed() {
        assert_eq!(validate_place_name("city", "  Peoria "), Ok("Peoria".to_string()));
        assert!(validate_place_name("city", "").is_err());
    }

    #[test]
    fn test_error_reports_field() {
        let err = validate_percentage("reservoir_level", 120.0).unwrap_err();
        assert_eq!(err.field(), "reservoir_level");
    }
}

//! Common types used across the platform

use serde::{Deserialize, Serialize};

use crate::validation::{validate_latitude, validate_longitude, ValidationError};

/// GPS coordinates in decimal degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GpsCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsCoordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build coordinates, rejecting values outside the WGS84 ranges
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        Ok(Self {
            latitude: validate_latitude(latitude)?,
            longitude: validate_longitude(longitude)?,
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_latitude(self.latitude)?;
        validate_longitude(self.longitude)?;
        Ok(())
    }
}

impl std::fmt::Display for GpsCoordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_valid() {
        let peoria = GpsCoordinates::try_new(40.6936, -89.5890).unwrap();
        assert_eq!(peoria.latitude, 40.6936);
        assert_eq!(peoria.to_string(), "40.6936, -89.5890");
    }

    #[test]
    fn test_try_new_rejects_out_of_range() {
        assert!(GpsCoordinates::try_new(91.0, 0.0).is_err());
        assert!(GpsCoordinates::try_new(0.0, -181.0).is_err());
        assert!(GpsCoordinates::try_new(f64::NAN, 0.0).is_err());
    }
}

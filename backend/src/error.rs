//! Error handling for the flood risk prediction service
//!
//! Every failure a request can hit maps onto one JSON error body and status
//! code: 400 for bad input, 502 for collaborator failures, 500 otherwise.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::ValidationError;
use thiserror::Error;

use crate::external::{GeocodingError, WeatherError};

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Validation error: {0}")]
    ValidationError(String),

    // External service errors
    #[error("Geocoding failed: {0}")]
    Geocoding(#[from] GeocodingError),

    #[error("Weather lookup failed: {0}")]
    Weather(#[from] WeatherError),

    // Internal errors
    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Geocoding(_) | AppError::Weather(_) => StatusCode::BAD_GATEWAY,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> ErrorDetail {
        match self {
            AppError::Validation(err) => ErrorDetail {
                code: "VALIDATION_ERROR".to_string(),
                message: err.to_string(),
                field: Some(err.field().to_string()),
            },
            AppError::ValidationError(msg) => ErrorDetail {
                code: "VALIDATION_ERROR".to_string(),
                message: msg.clone(),
                field: None,
            },
            AppError::Geocoding(GeocodingError::NotFound(place)) => ErrorDetail {
                code: "LOCATION_NOT_FOUND".to_string(),
                message: format!("No location found for {:?}", place),
                field: Some("city".to_string()),
            },
            AppError::Geocoding(_) => ErrorDetail {
                code: "GEOCODING_SERVICE_ERROR".to_string(),
                message: "Geocoding service is temporarily unavailable".to_string(),
                field: None,
            },
            AppError::Weather(WeatherError::NoForecastForDate(date)) => ErrorDetail {
                code: "FORECAST_UNAVAILABLE".to_string(),
                message: format!("No weather forecast is available for {}", date),
                field: Some("date".to_string()),
            },
            AppError::Weather(_) => ErrorDetail {
                code: "WEATHER_SERVICE_ERROR".to_string(),
                message: "Weather service is temporarily unavailable".to_string(),
                field: None,
            },
            AppError::InternalError(_) => ErrorDetail {
                code: "INTERNAL_ERROR".to_string(),
                message: "An internal server error occurred".to_string(),
                field: None,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }

        (
            status,
            Json(ErrorResponse {
                error: self.detail(),
            }),
        )
            .into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_status_mapping() {
        let validation = AppError::from(ValidationError::Missing { field: "city" });
        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);

        let geocoding = AppError::from(GeocodingError::Unavailable("timeout".into()));
        assert_eq!(geocoding.status_code(), StatusCode::BAD_GATEWAY);

        let weather = AppError::from(WeatherError::NoForecastForDate(
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        ));
        assert_eq!(weather.status_code(), StatusCode::BAD_GATEWAY);

        let internal = AppError::from(anyhow::anyhow!("boom"));
        assert_eq!(internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_detail_names_field() {
        let err = AppError::from(ValidationError::Negative {
            field: "previous_floods",
            value: -1.0,
        });
        let detail = err.detail();
        assert_eq!(detail.code, "VALIDATION_ERROR");
        assert_eq!(detail.field.as_deref(), Some("previous_floods"));
    }

    #[test]
    fn test_collaborator_detail_hides_upstream_message() {
        let err = AppError::from(WeatherError::Unavailable("connect error to 10.0.0.1".into()));
        let detail = err.detail();
        assert_eq!(detail.code, "WEATHER_SERVICE_ERROR");
        assert!(!detail.message.contains("10.0.0.1"));
    }
}

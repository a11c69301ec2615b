//! HTTP handlers for geocoding lookups

use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use shared::{validate_place_name, ValidationError};

use crate::error::{AppError, AppResult};
use crate::services::PredictionService;
use crate::AppState;

/// Query parameters for a geocoding lookup
#[derive(Debug, Deserialize)]
pub struct GeocodeQuery {
    pub city: Option<String>,
}

/// Coordinates in the shape the web map expects
#[derive(Debug, Serialize)]
pub struct GeocodeResponse {
    pub lat: f64,
    pub lng: f64,
}

/// Resolve a city name to coordinates
pub async fn geocode(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<GeocodeQuery>, AppError>,
) -> AppResult<Json<GeocodeResponse>> {
    let city = query
        .city
        .as_deref()
        .ok_or(ValidationError::Missing { field: "city" })?;
    let city = validate_place_name("city", city)?;

    let service = PredictionService::from_state(&state);
    let location = service.locate(&city).await?;

    Ok(Json(GeocodeResponse {
        lat: location.latitude,
        lng: location.longitude,
    }))
}

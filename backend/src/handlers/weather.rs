//! HTTP handlers for weather lookups

use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use serde::Deserialize;
use shared::{parse_date, GpsCoordinates, WeatherConditions};

use crate::error::{AppError, AppResult};
use crate::services::PredictionService;
use crate::AppState;

/// Query parameters for weather by location
#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub lat: f64,
    pub lon: f64,
    /// YYYY-MM-DD; today (UTC) when omitted
    pub date: Option<String>,
}

/// Fetch rainfall and temperature for a location
pub async fn get_weather(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<WeatherQuery>, AppError>,
) -> AppResult<Json<WeatherConditions>> {
    let location = GpsCoordinates::try_new(query.lat, query.lon)?;
    let date = match query.date.as_deref() {
        Some(date) => parse_date("date", date)?,
        None => Utc::now().date_naive(),
    };

    let service = PredictionService::from_state(&state);
    let conditions = service.conditions(location, date).await?;
    Ok(Json(conditions))
}

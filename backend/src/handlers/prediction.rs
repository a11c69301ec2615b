//! HTTP handlers for flood prediction endpoints

use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;

use crate::error::{AppError, AppResult};
use crate::services::{PredictionRequest, PredictionResponse, PredictionService};
use crate::AppState;

/// Evaluate flood risk for a submitted form
pub async fn predict(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<PredictionRequest>, AppError>,
) -> AppResult<Json<PredictionResponse>> {
    let service = PredictionService::from_state(&state);
    let prediction = service.predict(request).await?;
    Ok(Json(prediction))
}

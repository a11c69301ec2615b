//! Route definitions for the flood risk prediction service

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/predict", post(handlers::predict))
        .route("/geocode", get(handlers::geocode))
        .route("/weather", get(handlers::get_weather))
}

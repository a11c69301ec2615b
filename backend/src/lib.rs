//! Flood Risk Prediction Service - Backend
//!
//! Serves the prediction form's API: geocoding and weather lookups plus the
//! flood risk evaluation itself.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use shared::ScoringModel;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;

use external::{GeocodingProvider, WeatherProvider};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub geocoder: Arc<dyn GeocodingProvider>,
    pub weather: Arc<dyn WeatherProvider>,
    pub scoring: Arc<ScoringModel>,
}

impl AppState {
    pub fn new(
        geocoder: Arc<dyn GeocodingProvider>,
        weather: Arc<dyn WeatherProvider>,
        scoring: ScoringModel,
    ) -> Self {
        Self {
            geocoder,
            weather,
            scoring: Arc::new(scoring),
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .route("/predict", post(handlers::predict))
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Flood Risk Prediction API v1.0"
}

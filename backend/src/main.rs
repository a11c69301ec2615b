//! Flood Risk Prediction Service - Server binary

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use flood_risk_backend::{
    config::{Config, LogFormat},
    create_app,
    external::{GeocodingClient, WeatherClient},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load().context("failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "flood_server=debug,flood_risk_backend=debug,tower_http=debug".into()
    });
    let registry = tracing_subscriber::registry().with(filter);
    match config.logging.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!("Starting Flood Risk Prediction Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!(
        "Prediction threshold: {}%, river flood stage: {} m",
        config.scoring.prediction_threshold_percent,
        config.scoring.river_flood_stage_m
    );

    // Build collaborator clients
    let geocoder = match &config.geocoding.api_endpoint {
        Some(endpoint) => GeocodingClient::with_base_url(
            config.geocoding.api_key.clone(),
            endpoint.clone(),
            config.geocoding.timeout(),
        ),
        None => GeocodingClient::new(config.geocoding.api_key.clone(), config.geocoding.timeout()),
    }
    .context("failed to build geocoding client")?;

    let weather = match &config.weather.api_endpoint {
        Some(endpoint) => WeatherClient::with_base_url(
            config.weather.api_key.clone(),
            endpoint.clone(),
            config.weather.timeout(),
        ),
        None => WeatherClient::new(config.weather.api_key.clone(), config.weather.timeout()),
    }
    .context("failed to build weather client")?;

    // Create application state
    let state = AppState::new(Arc::new(geocoder), Arc::new(weather), config.scoring.clone());

    // Build application
    let app = create_app(state);

    // Start server
    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("invalid server.host {:?}", config.server.host))?;
    let addr = SocketAddr::new(host, config.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// SPDX-License-Identifier: MIT

//! Wayfarer API Server
//!
//! AI-assisted travel planning: trips, generated itineraries, travel
//! chat, and utility endpoints for weather, currency, translation and
//! places.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wayfarer::{
    config::Config,
    db::Database,
    services::{
        CurrencyService, GenAiClient, GenerationService, PlacesService, TranslationService,
        WeatherService,
    },
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Wayfarer API");

    // Open the database and run pending migrations
    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to open database");
    tracing::info!(url = %config.database_url, "Database ready");

    // External API adapters share one state; reqwest clients pool
    // connections internally.
    let weather = WeatherService::new(&config);
    let currency = CurrencyService::new(&config);
    let places = PlacesService::new(&config);
    let generation = GenerationService::new(GenAiClient::new(&config));
    let translation = TranslationService::new(GenAiClient::new(&config));

    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        weather,
        currency,
        places,
        generation,
        translation,
    });

    let app = wayfarer::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured logging. RUST_LOG overrides the defaults.
fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wayfarer=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

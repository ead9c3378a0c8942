// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout Tracker API Server
//!
//! Serves the local record store (exercises, workout templates, workout
//! sessions) to the browser front end.

use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workout_tracker::{
    config::Config,
    db::{FileMedium, RecordStore, StoreOptions},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(port = config.port, "Starting Workout Tracker API");

    // Open the storage medium and record store
    let medium = FileMedium::open(&config.data_dir, config.storage_quota_bytes)
        .context("Failed to open data directory")?;
    let store = RecordStore::open(
        Arc::new(medium),
        StoreOptions {
            seed_exercises: config.seed_exercises,
        },
    )
    .await
    .context("Failed to initialize record store")?;
    tracing::info!(data_dir = %config.data_dir.display(), "Record store ready");

    let state = Arc::new(AppState::new(config.clone(), store));

    // Build router
    let app = workout_tracker::routes::create_router(state);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("workout_tracker=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}

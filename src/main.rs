// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fitbit-Steps API Server
//!
//! Serves the step race report: refreshes Fitbit tokens for the tracked
//! users and returns their step counts for the current Eastern date.

use fitbit_steps::{
    config::{Config, TokenStoreBackend},
    db::{BlobStore, FirestoreBlobStore, FsBlobStore, MemoryBlobStore},
    services::{EnvSecretProvider, FitbitClient, StepsService, TokenStore},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        region = %config.region,
        users = ?config.users,
        "Starting Fitbit-Steps API"
    );

    let blobs: Arc<dyn BlobStore> = match &config.token_store {
        TokenStoreBackend::Firestore => Arc::new(
            FirestoreBlobStore::new(&config.gcp_project_id, &config.bucket_name).await?,
        ),
        TokenStoreBackend::File(root) => {
            tracing::info!(path = %root.display(), "Using local token store");
            Arc::new(FsBlobStore::new(root, &config.bucket_name))
        }
        TokenStoreBackend::Memory => {
            tracing::warn!("Using in-memory token store; tokens will not survive restart");
            Arc::new(MemoryBlobStore::new())
        }
    };
    let token_store = TokenStore::new(blobs, config.bucket_key.clone());
    tracing::info!(
        bucket = %config.bucket_name,
        key = %config.bucket_key,
        "Token store initialized"
    );

    let fitbit = FitbitClient::new(&config.fitbit_api_base, &config.fitbit_token_url);

    let steps_service = StepsService::new(
        &config,
        Arc::new(EnvSecretProvider),
        token_store,
        fitbit,
    );

    // Build shared state
    let state = Arc::new(AppState { steps_service });

    // Build router
    let app = fitbit_steps::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fitbit_steps=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}

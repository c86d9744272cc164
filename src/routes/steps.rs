// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Step report endpoint (called by the scheduler and the race page).

use crate::error::Result;
use crate::models::InvocationResponse;
use crate::AppState;
use axum::{extract::State, routing::get, Router};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/steps", get(get_steps))
}

/// Refresh tokens and return today's step report.
async fn get_steps(State(state): State<Arc<AppState>>) -> Result<InvocationResponse> {
    state
        .steps_service
        .invoke()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, code = e.code(), "Step report failed");
            e
        })
}

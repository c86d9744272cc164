// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Fitbit-Steps: daily step counts for a small step race
//!
//! This crate refreshes the tracked users' Fitbit OAuth tokens, keeps them
//! in a single stored document, and serves today's step counts and device
//! sync times as one JSON report.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use services::StepsService;

/// Shared application state.
pub struct AppState {
    pub steps_service: StepsService,
}

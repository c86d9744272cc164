// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Secret unavailable: {0}")]
    SecretUnavailable(String),

    #[error("Token store read failed: {0}")]
    StorageRead(String),

    #[error("Token store write failed: {0}")]
    StorageWrite(String),

    #[error("Token refresh failed for {user}: {message}")]
    Refresh { user: String, message: String },

    #[error("Fitbit API error: {0}")]
    FitbitApi(String),

    /// Fitbit answered, but reported errors in the response body.
    #[error("Fitbit reported errors for: {}", .users.join(", "))]
    UpstreamData { users: Vec<String> },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Short machine-readable code used in error response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::SecretUnavailable(_) => "secret_unavailable",
            AppError::StorageRead(_) => "storage_read_error",
            AppError::StorageWrite(_) => "storage_write_error",
            AppError::Refresh { .. } => "refresh_error",
            AppError::FitbitApi(_) => "fitbit_error",
            AppError::UpstreamData { .. } => "upstream_data_error",
            AppError::Internal(_) => "internal_error",
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, details) = match &self {
            AppError::Refresh { user, .. } => {
                (StatusCode::BAD_GATEWAY, Some(format!("refresh failed for {}", user)))
            }
            AppError::FitbitApi(msg) => (StatusCode::BAD_GATEWAY, Some(msg.clone())),
            AppError::UpstreamData { users } => {
                (StatusCode::BAD_GATEWAY, Some(users.join(", ")))
            }
            // Storage and secret details may leak infrastructure names.
            AppError::SecretUnavailable(_)
            | AppError::StorageRead(_)
            | AppError::StorageWrite(_)
            | AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, None),
        };

        let body = ErrorResponse {
            error: self.code().to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;

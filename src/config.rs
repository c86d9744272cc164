// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Built once at startup and handed to the services. Fitbit client
//! credentials are deliberately not part of it: they are fetched from the
//! secret store on every invocation.

use std::env;
use std::path::PathBuf;

/// Default set of tracked users.
pub const DEFAULT_USERS: [&str; 3] = ["kenzie", "nathan", "ben"];

/// Which blob store backs the token document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStoreBackend {
    /// Firestore collection (bucket) + document id (key).
    Firestore,
    /// Local directory (bucket) + file name (key).
    File(PathBuf),
    /// In-process only; tokens are lost on restart.
    Memory,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Deployment region (informational, reported at startup)
    pub region: String,
    /// GCP project ID (Firestore)
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,

    /// Bucket holding the token document
    pub bucket_name: String,
    /// Object key of the token document
    pub bucket_key: String,
    pub token_store: TokenStoreBackend,

    /// Tracked users, in response order
    pub users: Vec<String>,
    /// Value of `Access-Control-Allow-Origin` on step responses
    pub cors_origin: String,

    /// Name of the secret holding `{client_id, client_secret}`
    pub secret_name: String,
    /// Fitbit user API base (everything before `/activities/...`)
    pub fitbit_api_base: String,
    /// Fitbit OAuth2 token endpoint
    pub fitbit_token_url: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            region: "us-east-2".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            bucket_name: "fitbit-tokens".to_string(),
            bucket_key: "tokens.json".to_string(),
            token_store: TokenStoreBackend::Memory,
            users: DEFAULT_USERS.iter().map(|u| u.to_string()).collect(),
            cors_origin: "https://race.natewilcox.io".to_string(),
            secret_name: "fitbit-api-creds".to_string(),
            fitbit_api_base: "http://127.0.0.1:1/1/user/-".to_string(),
            fitbit_token_url: "http://127.0.0.1:1/oauth2/token".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let users = parse_users(
            &env::var("TRACKED_USERS").unwrap_or_else(|_| DEFAULT_USERS.join(",")),
        )?;

        let token_store = match env::var("TOKEN_STORE")
            .unwrap_or_else(|_| "firestore".to_string())
            .as_str()
        {
            "firestore" => TokenStoreBackend::Firestore,
            "file" => TokenStoreBackend::File(PathBuf::from(
                env::var("TOKEN_STORE_DIR").unwrap_or_else(|_| "./data".to_string()),
            )),
            "memory" => TokenStoreBackend::Memory,
            other => {
                return Err(ConfigError::Invalid(format!(
                    "TOKEN_STORE must be firestore, file or memory (got {other})"
                )))
            }
        };

        Ok(Self {
            region: env::var("REGION").unwrap_or_else(|_| "us-east-2".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            bucket_name: env::var("TOKEN_BUCKET").unwrap_or_else(|_| "fitbit-tokens".to_string()),
            bucket_key: env::var("TOKEN_KEY").unwrap_or_else(|_| "tokens.json".to_string()),
            token_store,
            users,
            cors_origin: env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "https://race.natewilcox.io".to_string()),
            secret_name: env::var("FITBIT_SECRET_NAME")
                .unwrap_or_else(|_| "fitbit-api-creds".to_string()),
            fitbit_api_base: env::var("FITBIT_API_BASE")
                .unwrap_or_else(|_| "https://api.fitbit.com/1/user/-".to_string()),
            fitbit_token_url: env::var("FITBIT_TOKEN_URL")
                .unwrap_or_else(|_| "https://api.fitbit.com/oauth2/token".to_string()),
        })
    }
}

/// Parse a comma-separated user list. Must be non-empty and duplicate-free.
fn parse_users(raw: &str) -> Result<Vec<String>, ConfigError> {
    let mut users: Vec<String> = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if name == "updated" {
            return Err(ConfigError::Invalid(
                "\"updated\" is reserved in the token document".to_string(),
            ));
        }
        if users.iter().any(|u| u == name) {
            return Err(ConfigError::Invalid(format!("duplicate user {name}")));
        }
        users.push(name.to_string());
    }

    if users.is_empty() {
        return Err(ConfigError::Missing("TRACKED_USERS"));
    }
    Ok(users)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

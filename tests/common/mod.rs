// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use fitbit_steps::config::Config;
use fitbit_steps::db::MemoryBlobStore;
use fitbit_steps::routes::create_router;
use fitbit_steps::services::steps::Clock;
use fitbit_steps::services::{
    FitbitClient, SecretProvider, StaticSecretProvider, StepsService, TokenStore,
};
use fitbit_steps::AppState;
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::json;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const USERS: [&str; 3] = ["kenzie", "nathan", "ben"];
pub const TOKEN_KEY: &str = "tokens.json";
pub const SECRET: &str = r#"{"client_id":"client","client_secret":"secret"}"#;

/// Mock Fitbit server plus an in-memory token store wired into a service.
#[allow(dead_code)]
pub struct Harness {
    pub server: ServerGuard,
    pub blobs: MemoryBlobStore,
    pub config: Config,
    pub service: StepsService,
}

/// Build a harness whose secret store returns `secret`.
#[allow(dead_code)]
pub async fn harness_with_secret(secret: &str) -> Harness {
    let server = mockito::Server::new_async().await;
    let config = Config {
        fitbit_api_base: format!("{}/1/user/-", server.url()),
        fitbit_token_url: format!("{}/oauth2/token", server.url()),
        cors_origin: "https://race.example.org".to_string(),
        ..Config::default()
    };

    let blobs = MemoryBlobStore::new();
    let secrets: Arc<dyn SecretProvider> = Arc::new(StaticSecretProvider::new(secret));
    let service = StepsService::new(
        &config,
        secrets,
        TokenStore::new(Arc::new(blobs.clone()), TOKEN_KEY),
        FitbitClient::new(&config.fitbit_api_base, &config.fitbit_token_url),
    );

    Harness {
        server,
        blobs,
        config,
        service,
    }
}

#[allow(dead_code)]
pub async fn harness() -> Harness {
    harness_with_secret(SECRET).await
}

/// Clock pinned to `now`.
#[allow(dead_code)]
pub fn fixed_clock(now: DateTime<Utc>) -> Clock {
    Arc::new(move || now)
}

/// Clock returning `instants` in turn, repeating the last one.
#[allow(dead_code)]
pub fn stepping_clock(instants: Vec<DateTime<Utc>>) -> Clock {
    let calls = AtomicUsize::new(0);
    Arc::new(move || {
        let i = calls.fetch_add(1, Ordering::SeqCst);
        instants[i.min(instants.len() - 1)]
    })
}

/// Router over the harness service.
#[allow(dead_code)]
pub fn create_test_app(h: &Harness) -> axum::Router {
    let state = Arc::new(AppState {
        steps_service: h.service.clone(),
    });
    create_router(state)
}

/// Token document with `a-<user>` / `r-<user>` for every tracked user.
#[allow(dead_code)]
pub fn seed_document() -> serde_json::Value {
    let mut doc = json!({ "updated": "2024-01-01T00:00:00.000Z" });
    for user in USERS {
        doc[user] = json!({
            "accessToken": format!("a-{user}"),
            "refreshToken": format!("r-{user}"),
        });
    }
    doc
}

#[allow(dead_code)]
pub fn seed_tokens(blobs: &MemoryBlobStore) {
    blobs.insert(TOKEN_KEY, seed_document().to_string());
}

/// Token endpoint reply for `user`: rotates to `new-a-<user>` / `new-r-<user>`.
#[allow(dead_code)]
pub async fn mock_refresh(server: &mut ServerGuard, user: &str) -> Mock {
    server
        .mock("POST", "/oauth2/token")
        .match_body(Matcher::UrlEncoded(
            "refresh_token".into(),
            format!("r-{user}"),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "access_token": format!("new-a-{user}"),
                "refresh_token": format!("new-r-{user}"),
                "expires_in": 28800,
                "token_type": "Bearer",
            })
            .to_string(),
        )
        .create_async()
        .await
}

#[allow(dead_code)]
pub async fn mock_refresh_rejected(server: &mut ServerGuard, user: &str) -> Mock {
    server
        .mock("POST", "/oauth2/token")
        .match_body(Matcher::UrlEncoded(
            "refresh_token".into(),
            format!("r-{user}"),
        ))
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"errors":[{"errorType":"invalid_grant","message":"Refresh token invalid"}],"success":false}"#)
        .create_async()
        .await
}

/// Daily summary for `user` (authenticated with its refreshed token).
#[allow(dead_code)]
pub async fn mock_summary(
    server: &mut ServerGuard,
    user: &str,
    status: usize,
    body: serde_json::Value,
) -> Mock {
    server
        .mock(
            "GET",
            Matcher::Regex(r"^/1/user/-/activities/date/\d{4}-\d{2}-\d{2}\.json$".to_string()),
        )
        .match_header("authorization", format!("Bearer new-a-{user}").as_str())
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

#[allow(dead_code)]
pub async fn mock_devices(server: &mut ServerGuard, user: &str, body: serde_json::Value) -> Mock {
    server
        .mock("GET", "/1/user/-/devices.json")
        .match_header("authorization", format!("Bearer new-a-{user}").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

/// Happy-path mocks for every tracked user: steps 1000/2000/3000, one device each.
#[allow(dead_code)]
pub async fn mock_all_ok(server: &mut ServerGuard) -> Vec<Mock> {
    let mut mocks = Vec::new();
    for (i, user) in USERS.iter().enumerate() {
        mocks.push(mock_refresh(server, user).await);
        mocks.push(
            mock_summary(
                server,
                user,
                200,
                json!({"summary": {"steps": (i + 1) * 1000}, "goals": {"steps": 10000}}),
            )
            .await,
        );
        mocks.push(
            mock_devices(
                server,
                user,
                json!([{"id": "1", "lastSyncTime": format!("2024-03-01T0{}:00:00.000", i + 1)}]),
            )
            .await,
        );
    }
    mocks
}

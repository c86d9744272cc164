// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Step report pipeline.
//!
//! One invocation runs, in order:
//! 1. Fetch client credentials from the secret store
//! 2. Read the token document
//! 3. Refresh every user's tokens (sequentially)
//! 4. Write the refreshed tokens back, only if every refresh succeeded
//! 5. Fetch summary + devices for every user concurrently
//! 6. Assemble the report, or the upstream-error response

use crate::config::Config;
use crate::error::AppError;
use crate::models::fitbit::last_sync_time;
use crate::models::{Credentials, DailySummary, InvocationResponse, StepsReport, TokenPair, UserSteps};
use crate::services::secrets::{get_credentials, SecretProvider};
use crate::services::{FitbitClient, TokenStore};
use crate::time_utils::{eastern_date, format_date};
use chrono::{DateTime, NaiveDate, Utc};
use futures_util::future::try_join_all;
use std::sync::Arc;

/// Raw Fitbit data fetched for one user.
#[derive(Debug, Clone)]
pub struct UserData {
    pub user: String,
    pub summary: DailySummary,
    pub devices: serde_json::Value,
}

/// Wall-clock source. Read once for the token timestamp and once when the
/// data-fetch phase starts.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Runs the whole refresh-and-report pipeline.
#[derive(Clone)]
pub struct StepsService {
    users: Vec<String>,
    secret_name: String,
    cors_origin: String,
    secrets: Arc<dyn SecretProvider>,
    tokens: TokenStore,
    fitbit: FitbitClient,
    clock: Clock,
}

impl StepsService {
    pub fn new(
        config: &Config,
        secrets: Arc<dyn SecretProvider>,
        tokens: TokenStore,
        fitbit: FitbitClient,
    ) -> Self {
        Self {
            users: config.users.clone(),
            secret_name: config.secret_name.clone(),
            cors_origin: config.cors_origin.clone(),
            secrets,
            tokens,
            fitbit,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the wall clock (tests pin it to fixed instants).
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Run one invocation and shape its response.
    ///
    /// Fitbit-reported data errors become the fixed 500 response. Every
    /// other failure is returned as `Err` for the caller to surface.
    pub async fn invoke(&self) -> Result<InvocationResponse, AppError> {
        match self.collect().await {
            Ok(report) => {
                tracing::info!(date = %report.date, users = report.users.len(), "Returning step report");
                InvocationResponse::ok(&report, &self.cors_origin)
                    .map_err(|e| AppError::Internal(anyhow::anyhow!("serialize report: {}", e)))
            }
            Err(AppError::UpstreamData { users }) => {
                tracing::error!(users = ?users, "Returning upstream error response");
                Ok(InvocationResponse::upstream_error(&self.cors_origin))
            }
            Err(e) => Err(e),
        }
    }

    /// Refresh tokens and build the report.
    ///
    /// The report date is the Eastern date when the fetch phase starts, after
    /// the token write, and is shared by every summary request.
    pub async fn collect(&self) -> Result<StepsReport, AppError> {
        let credentials = get_credentials(self.secrets.as_ref(), &self.secret_name).await?;

        let tokens = self.refresh_tokens(&credentials).await?;

        let date = eastern_date((self.clock)());
        tracing::info!(date = %format_date(date), "Requesting Fitbit data");
        let data = self.fetch_all(&tokens, date).await?;

        assemble(date, data)
    }

    /// Refresh every user's tokens, then persist them.
    ///
    /// Any failed refresh aborts before the write, so the stored document is
    /// never partially updated.
    pub async fn refresh_tokens(
        &self,
        credentials: &Credentials,
    ) -> Result<Vec<(String, TokenPair)>, AppError> {
        tracing::info!("Reading cached token file");
        let stored = self.tokens.read_tokens(&self.users).await?;

        tracing::info!(users = stored.len(), "Refreshing tokens");
        let mut refreshed = Vec::with_capacity(stored.len());
        for (user, pair) in stored {
            let new_pair = self.fitbit.refresh_token(credentials, &user, &pair).await?;
            tracing::debug!(user = %user, "Token refreshed");
            refreshed.push((user, new_pair));
        }

        tracing::info!("Writing cached token file");
        self.tokens.write_tokens(&refreshed, (self.clock)()).await?;

        Ok(refreshed)
    }

    /// Fetch summary and devices for every user at once.
    ///
    /// Resolves on the first failure; the remaining requests are dropped.
    pub async fn fetch_all(
        &self,
        tokens: &[(String, TokenPair)],
        date: NaiveDate,
    ) -> Result<Vec<UserData>, AppError> {
        try_join_all(tokens.iter().map(|(user, pair)| async move {
            let (summary, devices) = tokio::try_join!(
                self.fitbit.get_daily_summary(&pair.access_token, date),
                self.fitbit.get_devices(&pair.access_token),
            )?;
            Ok::<_, AppError>(UserData {
                user: user.clone(),
                summary,
                devices,
            })
        }))
        .await
    }
}

/// Build the report from per-user data.
///
/// Every user's summary is checked (and its errors logged) before deciding;
/// one user with errors fails the whole report.
pub fn assemble(date: NaiveDate, data: Vec<UserData>) -> Result<StepsReport, AppError> {
    let mut failed = Vec::new();
    for entry in &data {
        if entry.summary.has_errors() {
            tracing::error!(
                user = %entry.user,
                errors = ?entry.summary.errors,
                "Fitbit reported errors"
            );
            failed.push(entry.user.clone());
        }
    }
    if !failed.is_empty() {
        return Err(AppError::UpstreamData { users: failed });
    }

    let users = data
        .into_iter()
        .map(|entry| {
            let totals = entry.summary.summary.ok_or_else(|| {
                AppError::FitbitApi(format!("daily summary for {} has no summary", entry.user))
            })?;
            let steps = UserSteps {
                steps: totals.steps,
                sync: last_sync_time(&entry.devices),
            };
            Ok((entry.user, steps))
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    Ok(StepsReport {
        date: format_date(date),
        users,
    })
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fitbit Web API response shapes.

use serde::Deserialize;

/// Daily activity summary (`/activities/date/{date}.json`).
///
/// Fitbit reports failures in-band as an `errors` list, so both halves are
/// optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailySummary {
    #[serde(default)]
    pub summary: Option<ActivityTotals>,
    #[serde(default)]
    pub errors: Option<Vec<FitbitError>>,
}

impl DailySummary {
    /// True when Fitbit returned a non-empty error list.
    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|e| !e.is_empty())
    }
}

/// The `summary` object of a daily summary. Only steps are used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityTotals {
    #[serde(default)]
    pub steps: Option<u64>,
}

/// One entry of a Fitbit `errors` list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitbitError {
    #[serde(default)]
    pub error_type: String,
    #[serde(default)]
    pub message: String,
}

/// One entry of `/devices.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default)]
    pub last_sync_time: Option<String>,
}

/// Last sync time of the first listed device.
///
/// Anything other than a non-empty array (an empty list, or an error object
/// returned in place of the list) yields `None`.
pub fn last_sync_time(devices: &serde_json::Value) -> Option<String> {
    let first = devices.as_array()?.first()?;
    serde_json::from_value::<Device>(first.clone())
        .ok()?
        .last_sync_time
}

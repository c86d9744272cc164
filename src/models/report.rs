// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Step report payload and the HTTP response envelope it travels in.

use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Body message for any provider-reported data error.
pub const UPSTREAM_ERROR_MESSAGE: &str = "Error fetching fitbit data";

/// Per-user entry in the step report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export)
)]
pub struct UserSteps {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub steps: Option<u64>,
    /// Last device sync time, absent when the user has no devices
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync: Option<String>,
}

/// Successful report: `{"date": "YYYY-MM-DD", "<user>": {steps, sync}, ...}`.
///
/// Users serialize as top-level keys in configured order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepsReport {
    pub date: String,
    pub users: Vec<(String, UserSteps)>,
}

impl StepsReport {
    pub fn user(&self, name: &str) -> Option<&UserSteps> {
        self.users.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }
}

impl Serialize for StepsReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.users.len() + 1))?;
        map.serialize_entry("date", &self.date)?;
        for (name, steps) in &self.users {
            map.serialize_entry(name, steps)?;
        }
        map.end()
    }
}

/// `{statusCode, headers, body}` envelope returned for every step request.
///
/// `body` is already-serialized JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl InvocationResponse {
    /// 200 with the report as body.
    pub fn ok(report: &StepsReport, cors_origin: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            status_code: StatusCode::OK.as_u16(),
            headers: fixed_headers(cors_origin),
            body: serde_json::to_string(report)?,
        })
    }

    /// 500 with the generic upstream-error body.
    pub fn upstream_error(cors_origin: &str) -> Self {
        Self {
            status_code: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            headers: fixed_headers(cors_origin),
            body: serde_json::json!({ "error": UPSTREAM_ERROR_MESSAGE }).to_string(),
        }
    }
}

/// CORS and content headers sent on every step response.
fn fixed_headers(cors_origin: &str) -> BTreeMap<String, String> {
    [
        ("Access-Control-Allow-Methods", "GET"),
        ("Access-Control-Allow-Headers", "*"),
        ("Access-Control-Allow-Origin", cors_origin),
        ("Accept", "*/*"),
        ("Content-Type", "application/json"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl IntoResponse for InvocationResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();

        let headers = response.headers_mut();
        for (name, value) in &self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => tracing::warn!(header = %name, "Dropping invalid response header"),
            }
        }

        response
    }
}

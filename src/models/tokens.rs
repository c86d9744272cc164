// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persisted OAuth token document.

use crate::time_utils::format_utc_rfc3339;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One user's Fitbit OAuth tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// The single JSON document holding every tracked user's tokens.
///
/// Serialized flat: `{"updated": "...", "<user>": {"accessToken", "refreshToken"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDocument {
    /// When the document was last written (RFC3339, UTC)
    #[serde(default)]
    pub updated: String,
    #[serde(flatten)]
    pub users: BTreeMap<String, TokenPair>,
}

impl TokenDocument {
    /// Build a document stamped with `now`.
    pub fn new(users: BTreeMap<String, TokenPair>, now: DateTime<Utc>) -> Self {
        Self {
            updated: format_utc_rfc3339(now),
            users,
        }
    }

    /// Tokens for the given users, in the given order.
    ///
    /// Returns the name of the first user that has no entry.
    pub fn select(&self, users: &[String]) -> Result<Vec<(String, TokenPair)>, String> {
        users
            .iter()
            .map(|name| {
                self.users
                    .get(name)
                    .map(|pair| (name.clone(), pair.clone()))
                    .ok_or_else(|| name.clone())
            })
            .collect()
    }
}

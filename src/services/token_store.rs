// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Token store: the tracked users' OAuth tokens as one JSON object.
//!
//! There is no versioning. Every write replaces the whole document and the
//! last writer wins.

use crate::db::{BlobError, BlobStore};
use crate::error::AppError;
use crate::models::{TokenDocument, TokenPair};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;

const CONTENT_TYPE: &str = "application/json";

/// Reads and writes the token document at a fixed key.
#[derive(Clone)]
pub struct TokenStore {
    blobs: Arc<dyn BlobStore>,
    key: String,
}

impl TokenStore {
    pub fn new(blobs: Arc<dyn BlobStore>, key: impl Into<String>) -> Self {
        Self {
            blobs,
            key: key.into(),
        }
    }

    /// Load the raw document.
    pub async fn read_document(&self) -> Result<TokenDocument, AppError> {
        let body = self.blobs.get(&self.key).await.map_err(|e| match e {
            BlobError::NotFound { .. } => AppError::StorageRead(e.to_string()),
            BlobError::Backend(msg) => AppError::StorageRead(msg),
        })?;

        serde_json::from_str(&body)
            .map_err(|e| AppError::StorageRead(format!("token document is not valid: {}", e)))
    }

    /// Load the token pairs for `users`, in that order.
    ///
    /// A document missing any of them is treated as unreadable.
    pub async fn read_tokens(&self, users: &[String]) -> Result<Vec<(String, TokenPair)>, AppError> {
        let doc = self.read_document().await?;
        doc.select(users).map_err(|missing| {
            AppError::StorageRead(format!("token document has no entry for {}", missing))
        })
    }

    /// Overwrite the document with exactly `tokens`, stamped with `now`.
    pub async fn write_tokens(
        &self,
        tokens: &[(String, TokenPair)],
        now: DateTime<Utc>,
    ) -> Result<TokenDocument, AppError> {
        let users: BTreeMap<String, TokenPair> = tokens.iter().cloned().collect();
        let doc = TokenDocument::new(users, now);

        let body = serde_json::to_string(&doc)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("serialize token document: {}", e)))?;

        self.blobs
            .put(&self.key, &body, CONTENT_TYPE)
            .await
            .map_err(|e| AppError::StorageWrite(e.to_string()))?;

        Ok(doc)
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore-backed blob store.
//!
//! The bucket maps to a collection and each key to a document id. The
//! document carries the object body verbatim, so a `put` replaces the whole
//! object in one write.

use crate::db::{BlobError, BlobStore};
use crate::time_utils::format_utc_rfc3339;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Stored form of one blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BlobDocument {
    body: String,
    content_type: String,
    updated_at: String,
}

/// Firestore blob store bound to one collection.
#[derive(Clone)]
pub struct FirestoreBlobStore {
    client: firestore::FirestoreDb,
    bucket: String,
}

impl FirestoreBlobStore {
    /// Connect to Firestore.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str, bucket: &str) -> Result<Self, BlobError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        let client = if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            Self::create_emulator_client(project_id).await?
        } else {
            let client = firestore::FirestoreDb::new(project_id).await.map_err(|e| {
                BlobError::Backend(format!("Failed to connect to Firestore: {}", e))
            })?;
            tracing::info!(project = project_id, "Connected to Firestore");
            client
        };

        Ok(Self {
            client,
            bucket: bucket.to_string(),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<firestore::FirestoreDb, BlobError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            BlobError::Backend(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(client)
    }
}

#[async_trait]
impl BlobStore for FirestoreBlobStore {
    async fn get(&self, key: &str) -> Result<String, BlobError> {
        let doc: Option<BlobDocument> = self
            .client
            .fluent()
            .select()
            .by_id_in(&self.bucket)
            .obj()
            .one(key)
            .await
            .map_err(|e| BlobError::Backend(e.to_string()))?;

        doc.map(|d| d.body).ok_or_else(|| BlobError::NotFound {
            bucket: self.bucket.clone(),
            key: key.to_string(),
        })
    }

    async fn put(&self, key: &str, body: &str, content_type: &str) -> Result<(), BlobError> {
        let doc = BlobDocument {
            body: body.to_string(),
            content_type: content_type.to_string(),
            updated_at: format_utc_rfc3339(chrono::Utc::now()),
        };

        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(&self.bucket)
            .document_id(key)
            .object(&doc)
            .execute()
            .await
            .map_err(|e| BlobError::Backend(e.to_string()))?;
        Ok(())
    }
}

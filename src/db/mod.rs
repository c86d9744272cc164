// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Blob storage for the token document.
//!
//! A blob store holds opaque bodies under string keys inside one bucket.
//! The token store only ever touches a single key.

pub mod file;
pub mod firestore;
pub mod memory;

pub use file::FsBlobStore;
pub use firestore::FirestoreBlobStore;
pub use memory::MemoryBlobStore;

use async_trait::async_trait;

/// Blob store errors.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("object {key} not found in {bucket}")]
    NotFound { bucket: String, key: String },

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Minimal object storage: whole-object get and put.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Read an object body.
    async fn get(&self, key: &str) -> Result<String, BlobError>;

    /// Replace an object wholesale.
    async fn put(&self, key: &str, body: &str, content_type: &str) -> Result<(), BlobError>;
}

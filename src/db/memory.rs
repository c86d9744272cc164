// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process blob store (offline mode and tests).

use crate::db::{BlobError, BlobStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Blob store kept in memory. Clones share the same objects.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    objects: Arc<Mutex<HashMap<String, String>>>,
    writes: Arc<Mutex<usize>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object without counting it as a write.
    pub fn insert(&self, key: &str, body: impl Into<String>) {
        self.lock_objects().insert(key.to_string(), body.into());
    }

    /// Current body of an object, if any.
    pub fn body(&self, key: &str) -> Option<String> {
        self.lock_objects().get(key).cloned()
    }

    /// Number of `put` calls served.
    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_objects(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.objects.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, key: &str) -> Result<String, BlobError> {
        self.body(key).ok_or_else(|| BlobError::NotFound {
            bucket: "memory".to_string(),
            key: key.to_string(),
        })
    }

    async fn put(&self, key: &str, body: &str, _content_type: &str) -> Result<(), BlobError> {
        self.insert(key, body);
        *self.writes.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }
}

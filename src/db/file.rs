// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local-directory blob store for development.

use crate::db::{BlobError, BlobStore};
use async_trait::async_trait;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

/// Stores each key as a file under `root/bucket`.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    dir: PathBuf,
    bucket: String,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>, bucket: &str) -> Self {
        let dir = root.into().join(bucket);
        Self {
            dir,
            bucket: bucket.to_string(),
        }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, BlobError> {
        if key.is_empty() || key.contains(['/', '\\']) || key == "." || key == ".." {
            return Err(BlobError::Backend(format!("invalid object key {key:?}")));
        }
        Ok(self.dir.join(key))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn get(&self, key: &str) -> Result<String, BlobError> {
        let path = self.path_for(key)?;
        tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                BlobError::NotFound {
                    bucket: self.bucket.clone(),
                    key: key.to_string(),
                }
            } else {
                BlobError::Backend(format!("{}: {}", path.display(), e))
            }
        })
    }

    async fn put(&self, key: &str, body: &str, _content_type: &str) -> Result<(), BlobError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| BlobError::Backend(format!("{}: {}", self.dir.display(), e)))?;

        // Each write gets its own temp file beside the target and is renamed
        // over it, so overlapping writers never share a file and readers never
        // see a half-written object. The last rename wins.
        let dir = self.dir.clone();
        let body = body.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), BlobError> {
            let mut tmp = tempfile::NamedTempFile::new_in(&dir)
                .map_err(|e| BlobError::Backend(format!("{}: {}", dir.display(), e)))?;
            tmp.write_all(body.as_bytes())
                .and_then(|()| tmp.as_file().sync_all())
                .map_err(|e| BlobError::Backend(format!("{}: {}", tmp.path().display(), e)))?;
            tmp.persist(&path)
                .map(|_| ())
                .map_err(|e| BlobError::Backend(format!("{}: {}", path.display(), e.error)))
        })
        .await
        .map_err(|e| BlobError::Backend(format!("blob write task failed: {}", e)))?
    }
}

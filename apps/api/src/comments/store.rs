//! Comment persistence — one JSON document, replaced wholesale on write.
//!
//! The store interface is deliberately tiny (`read` / `replace`) so the
//! handlers never touch file handles and tests can swap in `MemoryStore`.
//! Replace writes a sibling temp file and renames it over the target, so
//! an external reader sees either the old document or the new one, never a
//! torn write. Two concurrent writers can still race; the later replace
//! wins (accepted limitation).

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::comments::models::StoredComment;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed comment document: {0}")]
    Json(#[from] serde_json::Error),
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Returns the full current collection.
    async fn read(&self) -> Result<Vec<StoredComment>, StoreError>;

    /// Replaces the full collection atomically.
    async fn replace(&self, comments: Vec<StoredComment>) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CommentsDocument {
    #[serde(default)]
    comments: Vec<StoredComment>,
}

/// Flat-file store backing the community board. A missing file reads as an
/// empty collection so first boot needs no setup step.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CommentStore for JsonFileStore {
    async fn read(&self) -> Result<Vec<StoredComment>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Io(e)),
        };
        let document: CommentsDocument = serde_json::from_slice(&bytes)?;
        Ok(document.comments)
    }

    async fn replace(&self, comments: Vec<StoredComment>) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(&CommentsDocument { comments })?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || -> Result<(), StoreError> {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
            tmp.write_all(&json)?;
            tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?
    }
}

/// In-memory store for tests and ephemeral deployments.
#[derive(Default)]
pub struct MemoryStore {
    comments: Mutex<Vec<StoredComment>>,
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn read(&self) -> Result<Vec<StoredComment>, StoreError> {
        Ok(self.comments.lock().await.clone())
    }

    async fn replace(&self, comments: Vec<StoredComment>) -> Result<(), StoreError> {
        *self.comments.lock().await = comments;
        Ok(())
    }
}

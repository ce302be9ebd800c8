//! Filesystem storage for rendered invoice documents.
//!
//! The stored file is a convenience artifact. The database row stays the
//! source of truth, and every read path re-renders from it, so a missing
//! or stale file is never an error outside the write itself.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use service_core::error::AppError;
use tokio::fs;

/// Replace anything outside `[A-Za-z0-9._-]` with an underscore so the
/// invoice number can be embedded in a file name. Falls back to
/// `"invoice"` when nothing survives.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "invoice".to_string()
    } else {
        cleaned
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Write `html` under `file_name`, returning the full path.
    async fn store(&self, file_name: &str, html: &str) -> Result<PathBuf, AppError>;

    /// Remove a stored document. Missing files are not an error.
    async fn remove(&self, file_name: &str) -> Result<(), AppError>;
}

pub struct LocalDocumentStore {
    base_path: PathBuf,
}

impl LocalDocumentStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn path_for(&self, file_name: &str) -> PathBuf {
        self.base_path.join(file_name)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn store(&self, file_name: &str, html: &str) -> Result<PathBuf, AppError> {
        fs::create_dir_all(&self.base_path).await.map_err(|e| {
            AppError::InternalError(anyhow::anyhow!(
                "Failed to create documents directory {}: {}",
                self.base_path.display(),
                e
            ))
        })?;

        let path = self.path_for(file_name);
        fs::write(&path, html).await.map_err(|e| {
            AppError::InternalError(anyhow::anyhow!(
                "Failed to write document {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::info!(path = %path.display(), "Stored invoice document");
        Ok(path)
    }

    async fn remove(&self, file_name: &str) -> Result<(), AppError> {
        let path = self.path_for(file_name);
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Removed invoice document");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::InternalError(anyhow::anyhow!(
                "Failed to remove document {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

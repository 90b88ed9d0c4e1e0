//! Status persister
//!
//! Writes the export status record at run start (`success: false`) and, only
//! after the whole pipeline succeeded, overwrites it with `success: true`.
//! Each write goes to a sibling temporary file that is then renamed over the
//! record, so a crash mid-write never leaves a truncated document.

use crate::core::state::status::{ExportStatus, EXPORT_DETAIL};
use crate::domain::errors::PagexError;
use crate::domain::Result;
use std::path::{Path, PathBuf};

/// Persists the export status record
#[derive(Debug, Clone)]
pub struct StatusPersister {
    /// Location of the status record
    path: PathBuf,
}

impl StatusPersister {
    /// Persister for the well-known record inside `dist_dir`
    pub fn new(dist_dir: impl AsRef<Path>) -> Self {
        Self {
            path: dist_dir.as_ref().join(EXPORT_DETAIL),
        }
    }

    /// Location of the status record
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record that an export into `out_dir` has started
    ///
    /// # Errors
    ///
    /// Returns `PagexError::State` if the record cannot be written.
    pub async fn mark_started(&self, out_dir: &Path) -> Result<ExportStatus> {
        let status = ExportStatus::started(out_dir.display().to_string());
        self.save(&status).await?;
        tracing::debug!(path = %self.path.display(), "Export status marked as started");
        Ok(status)
    }

    /// Record that the export into `out_dir` completed successfully
    ///
    /// # Errors
    ///
    /// Returns `PagexError::State` if the record cannot be written.
    pub async fn mark_succeeded(&self, out_dir: &Path) -> Result<ExportStatus> {
        let status = ExportStatus::started(out_dir.display().to_string()).completed();
        self.save(&status).await?;
        tracing::info!(path = %self.path.display(), "Export status marked as successful");
        Ok(status)
    }

    /// Load the record, if one was ever written
    ///
    /// # Errors
    ///
    /// Returns `PagexError::State` if the record exists but cannot be read or parsed.
    pub async fn load(&self) -> Result<Option<ExportStatus>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(PagexError::State(format!(
                    "Failed to read export status {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let status = serde_json::from_str(&contents).map_err(|e| {
            PagexError::State(format!(
                "Failed to parse export status {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(Some(status))
    }

    async fn save(&self, status: &ExportStatus) -> Result<()> {
        let body = serde_json::to_vec(status)?;
        let tmp = self.path.with_extension("json.tmp");

        tokio::fs::write(&tmp, &body).await.map_err(|e| {
            PagexError::State(format!(
                "Failed to write export status {}: {}",
                tmp.display(),
                e
            ))
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            PagexError::State(format!(
                "Failed to replace export status {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(())
    }
}

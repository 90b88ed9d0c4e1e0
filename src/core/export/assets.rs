//! Output directory preparation and static asset sync
//!
//! The [`AssetSync`] trait is the seam the coordinator uses for every bulk
//! filesystem operation; [`FsAssetSync`] is the local-disk implementation.

use crate::domain::errors::PagexError;
use crate::domain::Result;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Bulk filesystem operations used to prepare the export output
#[async_trait]
pub trait AssetSync: Send + Sync {
    /// Remove `dir` and everything under it; a missing directory is not an error
    async fn clean_dir(&self, dir: &Path) -> Result<()>;

    /// Recursively copy `from` into `to`
    ///
    /// Files whose `/`-prefixed path relative to `from` is in `exclude` are
    /// skipped. Returns the number of files copied.
    async fn copy_tree(&self, from: &Path, to: &Path, exclude: &BTreeSet<String>) -> Result<usize>;
}

/// Local filesystem implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct FsAssetSync;

#[async_trait]
impl AssetSync for FsAssetSync {
    async fn clean_dir(&self, dir: &Path) -> Result<()> {
        match tokio::fs::remove_dir_all(dir).await {
            Ok(()) => {
                tracing::debug!(dir = %dir.display(), "Removed previous output");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PagexError::Io(format!(
                "Failed to clean {}: {}",
                dir.display(),
                e
            ))),
        }
    }

    async fn copy_tree(&self, from: &Path, to: &Path, exclude: &BTreeSet<String>) -> Result<usize> {
        let mut pending: Vec<PathBuf> = vec![PathBuf::new()];
        let mut copied = 0;

        while let Some(relative) = pending.pop() {
            let source_dir = from.join(&relative);
            let mut entries = tokio::fs::read_dir(&source_dir).await.map_err(|e| {
                PagexError::Io(format!("Failed to read {}: {}", source_dir.display(), e))
            })?;

            while let Some(entry) = entries.next_entry().await? {
                let child = relative.join(entry.file_name());
                let file_type = entry.file_type().await?;

                if file_type.is_dir() {
                    pending.push(child);
                    continue;
                }

                let key = format!("/{}", child.to_string_lossy().replace('\\', "/"));
                if exclude.contains(&key) {
                    tracing::warn!(
                        file = %key,
                        "Skipping public file that collides with an exported page"
                    );
                    continue;
                }

                let target = to.join(&child);
                if let Some(parent) = target.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
                tokio::fs::copy(entry.path(), &target).await.map_err(|e| {
                    PagexError::Io(format!(
                        "Failed to copy {} to {}: {}",
                        entry.path().display(),
                        target.display(),
                        e
                    ))
                })?;
                copied += 1;
            }
        }

        tracing::debug!(
            from = %from.display(),
            to = %to.display(),
            files = copied,
            "Copied asset tree"
        );
        Ok(copied)
    }
}

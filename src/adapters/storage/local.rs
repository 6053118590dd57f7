//! Local-directory artifact store

use super::ArtifactStore;
use crate::domain::{HarvestError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Artifact store that publishes into a local directory and returns
/// `file://` URLs.
pub struct LocalArtifactStore {
    root: PathBuf,
}

impl LocalArtifactStore {
    /// Creates a store rooted at `root`. The directory is created lazily
    /// on first upload.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn upload_file(&self, logical_path: &str, local_path: &Path) -> Result<String> {
        let target = self.root.join(logical_path);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| HarvestError::Publish(format!("Failed to create {}: {e}", parent.display())))?;
        }

        tracing::info!(
            source = %local_path.display(),
            target = %target.display(),
            "Publishing artifact"
        );
        tokio::fs::copy(local_path, &target)
            .await
            .map_err(|e| HarvestError::Publish(format!("Failed to publish artifact: {e}")))?;

        let url = url::Url::from_file_path(&target)
            .map_err(|_| HarvestError::Publish(format!("Invalid artifact path: {}", target.display())))?;
        Ok(url.to_string())
    }
}

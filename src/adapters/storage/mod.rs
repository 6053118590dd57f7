//! Artifact storage adapter
//!
//! Publishing hands a packaged artifact to an [`ArtifactStore`] and gets a
//! retrievable URL back. The default implementation publishes into a local
//! directory; remote blob stores plug in behind the same trait.

pub mod local;

pub use local::LocalArtifactStore;

use crate::domain::Result;
use async_trait::async_trait;
use std::path::Path;

/// Storage for processed topic artifacts.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Uploads `local_path` under `logical_path` and returns a URL the
    /// artifact can be retrieved from.
    async fn upload_file(&self, logical_path: &str, local_path: &Path) -> Result<String>;
}

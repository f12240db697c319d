//! Read path for artifacts on disk.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::config::ArtifactPaths;
use crate::error::ArtifactError;
use crate::models::Artifact;

/// Reads artifact documents from their configured paths.
///
/// The store never writes; the notebook is the only producer. Each read
/// pulls the whole file into memory before parsing, so a file caught
/// mid-write fails to parse instead of yielding a truncated document.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    paths: Arc<ArtifactPaths>,
}

impl ArtifactStore {
    pub fn new(paths: ArtifactPaths) -> Self {
        Self {
            paths: Arc::new(paths),
        }
    }

    pub fn open_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(ArtifactPaths::in_dir(dir))
    }

    pub fn path_for(&self, artifact: Artifact) -> &Path {
        self.paths.path_for(artifact)
    }

    /// Load and parse an artifact. Any JSON value is accepted.
    pub async fn read(&self, artifact: Artifact) -> Result<Value, ArtifactError> {
        let path = self.path_for(artifact);
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ArtifactError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

//! Raw status artifacts for the pipeline workspace

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::error::CoreError;

/// Stores the raw status text captured for one host
#[async_trait]
pub trait ResultArchiver: Send + Sync {
    /// Persist `text` for `hostname`, returning where it went
    async fn archive(&self, hostname: &str, text: &str) -> Result<PathBuf, CoreError>;
}

/// Writes `<results-dir>/git_status/<hostname>.txt`
#[derive(Debug, Clone)]
pub struct FsArchiver {
    status_dir: PathBuf,
}

impl FsArchiver {
    #[must_use]
    pub fn new(results_dir: impl AsRef<Path>) -> Self {
        Self {
            status_dir: results_dir.as_ref().join("git_status"),
        }
    }

    #[must_use]
    pub fn status_dir(&self) -> &Path {
        &self.status_dir
    }
}

#[async_trait]
impl ResultArchiver for FsArchiver {
    async fn archive(&self, hostname: &str, text: &str) -> Result<PathBuf, CoreError> {
        let path = self.status_dir.join(format!("{hostname}.txt"));
        let to_error = |e: std::io::Error| CoreError::ArchiveError {
            path: path.clone(),
            message: e.to_string(),
        };

        tokio::fs::create_dir_all(&self.status_dir)
            .await
            .map_err(to_error)?;
        tokio::fs::write(&path, text).await.map_err(to_error)?;

        debug!(host = %hostname, path = %path.display(), "archived git status");
        Ok(path)
    }
}

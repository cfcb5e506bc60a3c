//! Per-job scratch directory for downloads

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::domain::errors::*;

const PREFIX: &str = "youtube_splitter_";

/// Temporary directory removed on drop or by `cleanup`
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn create() -> Result<Self, DomainError> {
        let dir = tempfile::Builder::new()
            .prefix(PREFIX)
            .tempdir()
            .map_err(|e| DomainError::FsFail(format!("Failed to create temp directory: {}", e)))?;
        debug!(path = %dir.path().display(), "Created workspace");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the directory now, logging rather than failing
    pub fn cleanup(self) {
        let path = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => debug!(path = %path.display(), "Removed workspace"),
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove workspace"),
        }
    }

    /// Keep the directory on disk and return its path
    pub fn keep(self) -> PathBuf {
        self.dir.into_path()
    }
}

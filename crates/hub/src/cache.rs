//! Local fallback copy of the system document.
//!
//! Written after every successful remote read or write, read when the remote
//! store is unavailable. Writes go to a sibling temp file that is then renamed
//! over the cache, so a crash never leaves a half-written document behind.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use storage_hub_core::SystemData;
use thiserror::Error;

/// Errors reading or writing the cache file.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cache file is not a valid document: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// JSON file holding the last known aggregate.
#[derive(Debug, Clone)]
pub struct LocalCache {
    path: PathBuf,
}

impl LocalCache {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Read the cached aggregate. `Ok(None)` when no cache file exists.
    ///
    /// # Errors
    ///
    /// Returns `CacheError` if the file cannot be read or does not decode.
    pub async fn load(&self) -> Result<Option<SystemData>, CacheError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the cached aggregate.
    ///
    /// # Errors
    ///
    /// Returns `CacheError` if the document cannot be written or renamed
    /// into place.
    pub async fn store(&self, data: &SystemData) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(data)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let temp = self.temp_path();
        tokio::fs::write(&temp, &bytes).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        Ok(())
    }
}

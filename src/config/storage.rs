//! Session storage configuration.

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Session storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Storage backend to use.
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory for the file backend's session documents.
    pub session_dir: Option<PathBuf>,
}

/// Session storage backend kind.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// In-process storage; sessions do not survive a restart.
    #[default]
    Memory,
    /// One YAML document per session on disk.
    File,
}

impl StorageConfig {
    /// Validate storage configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.backend == StorageBackend::File && self.session_dir.is_none() {
            return Err(ValidationError::MissingSessionDir);
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            session_dir: None,
        }
    }
}

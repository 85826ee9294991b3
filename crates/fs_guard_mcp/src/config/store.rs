use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::errors::{FsGuardError, FsGuardResult};
use crate::utils::path::absolutize;

/// The persisted configuration record, mirroring the on-disk JSON.
///
/// Only `allowedDirectories` belongs to this crate. The file is shared with
/// other configuration consumers (MCP client settings live in the same
/// record), so every field we do not understand is captured verbatim and
/// written back untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedConfig {
    /// Directories file operations are confined to, absolute at write time.
    /// Entries are intended future-valid roots and need not exist yet.
    #[serde(rename = "allowedDirectories", skip_serializing_if = "Option::is_none")]
    pub allowed_directories: Option<Vec<String>>,

    /// Fields owned by other consumers of the shared file.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Durable storage for the directory allow-list.
///
/// Holds nothing but the file location: every call reflects the on-disk
/// state at that moment, so edits made by other processes are observed on
/// the next call without any cache invalidation.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store rooted at an explicit file location.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the well-known per-user location.
    ///
    /// # Errors
    /// `FsGuardError::ConfigUnavailable` when the platform exposes no user
    /// configuration directory.
    pub fn at_default_location() -> FsGuardResult<Self> {
        crate::config::default_config_path()
            .map(Self::new)
            .ok_or_else(|| FsGuardError::ConfigUnavailable {
                reason: "no user configuration directory on this platform".to_string(),
            })
    }

    /// File this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted record.
    ///
    /// Missing, unreadable, or malformed content yields the default record
    /// instead of an error: a first run has no file yet, and a tampered
    /// file must not take the host process down. The absent-file case is
    /// ordinary and logged at debug; anything else is logged at warn.
    pub async fn read(&self) -> PersistedConfig {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No persisted config at {}, using defaults", self.path.display());
                return PersistedConfig::default();
            }
            Err(e) => {
                tracing::warn!(
                    "Cannot read config at {}: {}; using defaults",
                    self.path.display(),
                    e
                );
                return PersistedConfig::default();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    "Malformed config at {}: {}; using defaults",
                    self.path.display(),
                    e
                );
                PersistedConfig::default()
            }
        }
    }

    /// Replace the record on disk.
    ///
    /// Creates intermediate directories as needed, then writes through a
    /// process-unique temporary file renamed over the destination, so a
    /// concurrent reader sees either the old record or the new one, never a
    /// torn write.
    pub async fn write(&self, config: &PersistedConfig) -> FsGuardResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| FsGuardError::Storage {
                    path: parent.display().to_string(),
                    source: e,
                })?;
        }

        let json = serde_json::to_string_pretty(config).map_err(|e| FsGuardError::Storage {
            path: self.path.display().to_string(),
            source: std::io::Error::other(e),
        })?;

        let tmp = self
            .path
            .with_extension(format!("tmp.{}", std::process::id()));
        fs::write(&tmp, json).await.map_err(|e| FsGuardError::Storage {
            path: tmp.display().to_string(),
            source: e,
        })?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| FsGuardError::Storage {
                path: self.path.display().to_string(),
                source: e,
            })
    }

    /// Replace the stored allow-list.
    ///
    /// Each entry is resolved to absolute form, joined to the process
    /// current directory when relative and lexically normalized. No
    /// filesystem access happens, so entries need not exist yet. Every
    /// other field of the shared record rides along unchanged.
    pub async fn update_allowed_directories(&self, dirs: &[PathBuf]) -> FsGuardResult<()> {
        let mut resolved = Vec::with_capacity(dirs.len());
        for dir in dirs {
            let absolute = absolutize(dir).map_err(|e| FsGuardError::Storage {
                path: dir.display().to_string(),
                source: e,
            })?;
            resolved.push(absolute.to_string_lossy().into_owned());
        }

        let mut config = self.read().await;
        config.allowed_directories = Some(resolved);
        self.write(&config).await
    }

    /// The persisted allow-list, empty when unset.
    pub async fn allowed_directories(&self) -> Vec<PathBuf> {
        self.read()
            .await
            .allowed_directories
            .unwrap_or_default()
            .into_iter()
            .map(PathBuf::from)
            .collect()
    }
}

//! Path validation against the directory allow-list.
//!
//! This is the security boundary: every file operation the host server
//! performs on behalf of a client goes through [`PathValidator::validate`]
//! first and aborts on rejection. A validated path is absolute and, for
//! existing targets, canonical, so no symlink inside an allowed directory
//! can reach outside the allow-list.
//!
//! # Residual Risk
//!
//! Validation and the subsequent file operation are separate steps, so the
//! filesystem can change in between (a file swapped for a symlink after
//! validation passes). Closing that gap would take handle-based
//! open-then-verify I/O; callers should treat the verdict as valid at the
//! time it was produced.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::config::ConfigStore;
use crate::errors::{DeniedReason, FsGuardError, FsGuardResult};
use crate::utils::fs::{resolve_directories, validate_directories};
use crate::utils::path::{absolutize, expand_home, is_path_within_allowed_directories};

/// How a candidate path maps onto the real filesystem.
enum ResolvedPath {
    /// The candidate exists; this is its canonical, symlink-free form.
    Existing(PathBuf),
    /// The candidate does not exist yet; this is the canonical form of its
    /// closest existing ancestor, its parent.
    Pending { parent: PathBuf },
}

/// Canonicalize the candidate, falling back to its parent when the
/// candidate itself does not exist. Both legs resolve symlinks, so the
/// caller always checks a real path, never a lexical one.
async fn resolve_real_path(candidate: &Path) -> FsGuardResult<ResolvedPath> {
    match fs::canonicalize(candidate).await {
        Ok(real) => Ok(ResolvedPath::Existing(real)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let parent = candidate
                .parent()
                .ok_or_else(|| FsGuardError::ParentNotFound {
                    path: candidate.display().to_string(),
                })?;
            match fs::canonicalize(parent).await {
                Ok(real_parent) => Ok(ResolvedPath::Pending {
                    parent: real_parent,
                }),
                Err(e) if e.kind() == ErrorKind::NotFound => Err(FsGuardError::ParentNotFound {
                    path: parent.display().to_string(),
                }),
                Err(e) => Err(FsGuardError::Storage {
                    path: parent.display().to_string(),
                    source: e,
                }),
            }
        }
        Err(e) => Err(FsGuardError::Storage {
            path: candidate.display().to_string(),
            source: e,
        }),
    }
}

/// Union of boot-time and stored allow-lists, boot entries first,
/// duplicates dropped at their second appearance.
pub fn merge_allowed_directories(boot: &[PathBuf], stored: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut merged = Vec::with_capacity(boot.len() + stored.len());
    for dir in boot.iter().cloned().chain(stored) {
        if seen.insert(dir.clone()) {
            merged.push(dir);
        }
    }
    merged
}

fn denied(reason: DeniedReason, path: &Path, allowed: &[PathBuf]) -> FsGuardError {
    FsGuardError::AccessDenied {
        reason,
        path: path.display().to_string(),
        allowed: allowed.iter().map(|d| d.display().to_string()).collect(),
    }
}

/// Gatekeeper for every path a file operation wants to touch.
///
/// Holds the canonicalized boot-time directories and a handle to the
/// persisted allow-list. The two are merged fresh on every validation, so
/// allow-list edits made while the process runs take effect on the next
/// call without a restart.
#[derive(Debug, Clone)]
pub struct PathValidator {
    boot_directories: Vec<PathBuf>,
    store: ConfigStore,
}

impl PathValidator {
    /// Validator over already-canonicalized boot directories.
    ///
    /// Callers that start from raw user input should go through
    /// [`PathValidator::bootstrap`] instead, which resolves and verifies
    /// the directories first.
    pub fn new(boot_directories: Vec<PathBuf>, store: ConfigStore) -> Self {
        Self {
            boot_directories,
            store,
        }
    }

    /// Resolve, verify, and persist the boot-time directories, then build
    /// the validator over them.
    ///
    /// Each directory must exist, be a directory, and be listable; symlinks
    /// are resolved so the allow-list holds real paths. The resolved list
    /// replaces the stored one, making the startup choice durable.
    ///
    /// # Errors
    /// `DirectoryNotFound`, `NotADirectory`, or `DirectoryUnreadable` for a
    /// directory that fails verification, `Storage` when persisting fails.
    pub async fn bootstrap(directories: &[PathBuf], store: ConfigStore) -> FsGuardResult<Self> {
        let resolved = resolve_directories(directories).await?;
        validate_directories(&resolved).await?;
        store.update_allowed_directories(&resolved).await?;
        tracing::debug!(
            "Allow-list of {} directories persisted to {}",
            resolved.len(),
            store.path().display()
        );
        Ok(Self::new(resolved, store))
    }

    /// Directories fixed at startup.
    pub fn boot_directories(&self) -> &[PathBuf] {
        &self.boot_directories
    }

    /// The persistent allow-list store behind this validator.
    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Current effective allow-list: boot directories merged with the
    /// stored ones, re-read from disk on every call.
    pub async fn effective_directories(&self) -> Vec<PathBuf> {
        let stored = self.store.allowed_directories().await;
        merge_allowed_directories(&self.boot_directories, stored)
    }

    /// Validate a requested path against the effective allow-list.
    ///
    /// The path is taken as the client sent it: `~` expands to the home
    /// directory and relative paths resolve against the process current
    /// directory. The normalized candidate must sit inside an allowed
    /// directory, and so must its canonical form, so a symlink inside an
    /// allowed directory cannot reach outside it. A path that does not
    /// exist yet is accepted when its parent's canonical form is allowed,
    /// which is what create-style operations need.
    ///
    /// Returns the canonical path for an existing target and the normalized
    /// candidate for a pending one.
    ///
    /// # Errors
    /// `AccessDenied` when the candidate, its canonical form, or its
    /// parent's canonical form falls outside every allowed directory,
    /// `ParentNotFound` when neither the candidate nor its parent exists,
    /// `Storage` for unexpected I/O failures during resolution.
    pub async fn validate(&self, requested: &str) -> FsGuardResult<PathBuf> {
        let expanded = expand_home(requested);
        let candidate = absolutize(Path::new(&expanded)).map_err(|e| FsGuardError::Storage {
            path: expanded.clone(),
            source: e,
        })?;

        // Snapshot the allow-list once; the whole decision uses one view.
        let allowed = self.effective_directories().await;

        // Lexical check first, before touching the filesystem.
        if !is_path_within_allowed_directories(&candidate, &allowed) {
            return Err(denied(DeniedReason::Path, &candidate, &allowed));
        }

        // Re-check against the real path so symlinks cannot smuggle the
        // operation outside the allow-list.
        match resolve_real_path(&candidate).await? {
            ResolvedPath::Existing(real) => {
                if !is_path_within_allowed_directories(&real, &allowed) {
                    return Err(denied(DeniedReason::SymlinkTarget, &real, &allowed));
                }
                Ok(real)
            }
            ResolvedPath::Pending { parent } => {
                if !is_path_within_allowed_directories(&parent, &allowed) {
                    return Err(denied(DeniedReason::ParentDirectory, &parent, &allowed));
                }
                Ok(candidate)
            }
        }
    }
}

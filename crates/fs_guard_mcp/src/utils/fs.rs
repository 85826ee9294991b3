//! Boot-time directory checks.
//!
//! The directories named at startup are the trust anchors for everything the
//! validator later decides, so they get the strict treatment: each must
//! exist, be a directory, and be readable before the process continues.
//! Failure of any single one is fatal to startup.

use std::io;
use std::path::PathBuf;

use tokio::fs;

use crate::errors::{FsGuardError, FsGuardResult};
use crate::utils::path::expand_home;

/// Canonicalize the boot-time directories.
///
/// `~` expands to the home directory, then every entry is resolved to its
/// real, symlink-free form so later containment checks line up with
/// canonicalized candidates (a symlinked `/tmp` or home directory would
/// otherwise never match). Order is preserved; the first bad entry aborts.
pub async fn resolve_directories(directories: &[PathBuf]) -> FsGuardResult<Vec<PathBuf>> {
    let mut resolved = Vec::with_capacity(directories.len());

    for dir in directories {
        let expanded = PathBuf::from(expand_home(&dir.to_string_lossy()));
        let canonical = fs::canonicalize(&expanded).await.map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                FsGuardError::DirectoryNotFound {
                    path: expanded.display().to_string(),
                }
            } else {
                FsGuardError::Storage {
                    path: expanded.display().to_string(),
                    source: e,
                }
            }
        })?;

        let metadata = fs::metadata(&canonical)
            .await
            .map_err(|e| FsGuardError::Storage {
                path: canonical.display().to_string(),
                source: e,
            })?;
        if !metadata.is_dir() {
            return Err(FsGuardError::NotADirectory {
                path: canonical.display().to_string(),
            });
        }

        resolved.push(canonical);
    }

    Ok(resolved)
}

/// Check each directory is readable.
///
/// Existence is not enough: the validator is useless over a directory the
/// process cannot list.
pub async fn validate_directories(directories: &[PathBuf]) -> FsGuardResult<()> {
    for dir in directories {
        if let Err(e) = fs::read_dir(dir).await {
            return Err(FsGuardError::DirectoryUnreadable {
                path: dir.display().to_string(),
                source: e,
            });
        }
    }

    tracing::debug!("boot directory validation completed");
    Ok(())
}

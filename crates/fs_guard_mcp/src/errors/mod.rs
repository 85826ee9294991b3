use core::fmt;
use std::io;

/// Type alias for MCP protocol errors
pub type McpError = rmcp::ErrorData;

/// Result type for guard operations
pub type FsGuardResult<T> = Result<T, FsGuardError>;

/// Which resolved form of a candidate path fell outside the allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeniedReason {
    /// The normalized candidate itself.
    Path,
    /// The candidate's canonical (symlink-free) form.
    SymlinkTarget,
    /// The canonical form of the candidate's parent directory.
    ParentDirectory,
}

impl fmt::Display for DeniedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DeniedReason::Path => "path",
            DeniedReason::SymlinkTarget => "symlink target",
            DeniedReason::ParentDirectory => "parent directory",
        })
    }
}

/// Guard errors
///
/// Denials and missing parents are terminal for a request; storage faults
/// are the caller's cue to fix the environment and retry.
#[derive(thiserror::Error, Debug)]
pub enum FsGuardError {
    /// The candidate, its real path, or its parent's real path lies outside
    /// every allowed directory. Carries the allow-list snapshot that made
    /// the decision.
    #[error("Access denied - {reason} outside allowed directories: {path} not in [{}]", .allowed.join(", "))]
    AccessDenied {
        reason: DeniedReason,
        path: String,
        allowed: Vec<String>,
    },
    /// Target does not exist and neither does its parent, so nothing can be
    /// created there.
    #[error("Parent directory does not exist: {path}")]
    ParentNotFound { path: String },
    /// A boot-time directory is missing.
    #[error("Directory does not exist: {path}")]
    DirectoryNotFound { path: String },
    /// A boot-time path exists but is not a directory.
    #[error("Not a directory: {path}")]
    NotADirectory { path: String },
    /// A boot-time directory cannot be listed.
    #[error("Cannot read directory {path}: {source}")]
    DirectoryUnreadable {
        path: String,
        #[source]
        source: io::Error,
    },
    /// No usable location for the persisted allow-list.
    #[error("Configuration unavailable: {reason}")]
    ConfigUnavailable { reason: String },
    /// Unexpected I/O failure, distinct from not-found and access-denied.
    #[error("Storage error at {path}: {source}")]
    Storage {
        path: String,
        #[source]
        source: io::Error,
    },
    /// Logging initialization failed
    #[error("Logging initialization failed: {0}")]
    LoggingInitialization(String),
}

impl From<FsGuardError> for McpError {
    fn from(err: FsGuardError) -> Self {
        match &err {
            FsGuardError::AccessDenied { allowed, .. } => McpError::invalid_request(
                err.to_string(),
                Some(serde_json::json!({ "allowedDirectories": allowed })),
            ),
            FsGuardError::ParentNotFound { .. } | FsGuardError::DirectoryNotFound { .. } => {
                McpError::resource_not_found(err.to_string(), None)
            }
            FsGuardError::NotADirectory { .. } | FsGuardError::ConfigUnavailable { .. } => {
                McpError::invalid_params(err.to_string(), None)
            }
            FsGuardError::DirectoryUnreadable { .. }
            | FsGuardError::Storage { .. }
            | FsGuardError::LoggingInitialization(_) => {
                McpError::internal_error(err.to_string(), None)
            }
        }
    }
}

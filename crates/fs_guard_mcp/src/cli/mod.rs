use std::path::PathBuf;

use clap::Parser;

use crate::config::ConfigStore;
use crate::errors::{FsGuardError, FsGuardResult};
use crate::service::PathValidator;

/// Filesystem Guard for MCP Servers
///
/// Enforces a directory allow-list for Model Context Protocol filesystem
/// servers: file operations are confined to the directories granted at
/// startup plus those recorded in the shared desktop configuration file.
///
/// ## Features
/// - **Allow-list**: Startup directories merged with the persisted allow-list
/// - **Security**: Symlink-aware validation with canonical re-checks
/// - **Persistence**: Startup grants written back to the desktop configuration
///
/// ## Configuration
/// The allow-list lives next to the MCP client settings:
/// ```json
/// {
///   "allowedDirectories": ["/home/user/documents"],
///   "mcpServers": {
///     "filesystem": {
///       "command": "mcp-fs-guard",
///       "args": ["/home/user/documents"],
///       "env": {
///         "RUST_LOG": "info"
///       }
///     }
///   }
/// }
/// ```
///
/// ## Environment Variables
/// - `RUST_LOG`: Controls logging verbosity (trace, debug, info, warn, error)
#[derive(Parser, Debug, Clone)]
#[command(name = "mcp-fs-guard")]
#[command(about = "Directory allow-list gate for MCP filesystem servers")]
#[command(version)]
#[command(
    long_about = "Guards filesystem access for Model Context Protocol (MCP) servers. \nDirectories granted on the command line are verified, canonicalized, and persisted \nto the shared desktop configuration; candidate paths can then be checked against \nthe effective allow-list, including symlink resolution."
)]
pub struct Cli {
    /// Directories to grant at startup.
    ///
    /// At least one is required. Validation confines every path to these
    /// directories, the persisted allow-list, and their subdirectories.
    #[arg(
        required = true,
        help = "Directories to allow filesystem operations in",
        value_name = "DIRECTORY",
        long_help = "Specify one or more directories where filesystem operations are allowed. \nEach must exist and be readable; symlinks are resolved before the directory \nis added to the allow-list. Absolute, relative, and ~ paths are accepted."
    )]
    pub directories: Vec<PathBuf>,

    /// Candidate paths to validate against the allow-list.
    ///
    /// Without this flag the command prints the effective allow-list and
    /// exits. With it, each path is validated in order and the process
    /// exits non-zero when any check fails.
    #[arg(
        long,
        value_name = "PATH",
        help = "Validate a path against the allow-list (repeatable)"
    )]
    pub check: Vec<String>,

    /// Allow-list file to use instead of the default desktop configuration.
    #[arg(
        long,
        value_name = "FILE",
        help = "Path to the configuration file holding the allow-list"
    )]
    pub config: Option<PathBuf>,
}

/// Bootstrap the validator from the parsed arguments and run the requested
/// command: print the effective allow-list, or check candidate paths.
///
/// Returns the number of failed checks so the caller owns the exit code.
/// Denied paths print under `denied:`; paths whose parent does not exist yet
/// print under `not-found:`.
pub async fn run(cli: Cli) -> FsGuardResult<usize> {
    let store = match &cli.config {
        Some(path) => ConfigStore::new(path.clone()),
        None => ConfigStore::at_default_location()?,
    };
    let validator = PathValidator::bootstrap(&cli.directories, store).await?;

    tracing::info!(
        "Path validator ready: {} boot directories, allow-list at {}",
        validator.boot_directories().len(),
        validator.store().path().display()
    );

    if cli.check.is_empty() {
        println!("Allowed directories:");
        for dir in validator.effective_directories().await {
            println!("  {}", dir.display());
        }
        return Ok(0);
    }

    let mut failed = 0;
    for requested in &cli.check {
        match validator.validate(requested).await {
            Ok(validated) => println!("ok: {requested} -> {}", validated.display()),
            Err(e @ FsGuardError::AccessDenied { .. }) => {
                failed += 1;
                println!("denied: {e}");
            }
            Err(e @ FsGuardError::ParentNotFound { .. }) => {
                failed += 1;
                println!("not-found: {e}");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(failed)
}

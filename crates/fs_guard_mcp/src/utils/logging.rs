use tracing_subscriber::{EnvFilter, prelude::*};

use crate::errors::{FsGuardError, FsGuardResult};

/// Initialize logging based on environment configuration
///
/// Honors `RUST_LOG` (trace, debug, info, warn, error) and stays silent when
/// it is unset. Diagnostics go to stderr; stdout belongs to command output.
///
/// # Returns
/// - `Ok(())` if logging is successfully initialized or skipped
/// - `Err(FsGuardError::LoggingInitialization)` if initialization fails
pub fn init_logging() -> FsGuardResult<()> {
    // Check if RUST_LOG is set, skip logging if not
    if std::env::var("RUST_LOG").is_err() {
        return Ok(());
    }

    let env_filter = EnvFilter::from_default_env();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .try_init()
        .map_err(|e| FsGuardError::LoggingInitialization(e.to_string()))?;

    Ok(())
}

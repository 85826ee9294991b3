//! Persisted allow-list configuration.
//!
//! The allow-list lives in the desktop client's own configuration file so
//! that users edit one record, not two. [`ConfigStore`] owns the read and
//! write paths; [`default_config_path`] locates the shared file.

use std::path::PathBuf;

pub mod store;

pub use store::ConfigStore;

/// Well-known location of the shared desktop configuration file, or `None`
/// when the platform exposes no per-user configuration directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("Claude").join("claude_desktop_config.json"))
}

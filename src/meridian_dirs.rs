//! Application directory paths for Meridian.
//!
//! Uses the [`dirs`] crate for platform-appropriate directory resolution.
//!
//! | Purpose | macOS | Linux |
//! |---------|-------|-------|
//! | Config | `~/Library/Application Support/meridian/` | `~/.config/meridian/` |
//!
//! Override with `MERIDIAN_CONFIG_DIR` for testing or custom deployments.

use std::path::PathBuf;

/// Application config directory.
///
/// Resolves to `dirs::config_dir()/meridian/` by default. Override with
/// the `MERIDIAN_CONFIG_DIR` environment variable.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("MERIDIAN_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("meridian"))
        .unwrap_or_else(|| PathBuf::from("/tmp/meridian-config"))
}

/// Default config file (`config_dir()/config.toml`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

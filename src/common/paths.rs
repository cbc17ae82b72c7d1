//! Centralized path management for homesync

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Get the homesync config directory
pub fn homesync_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Unable to determine user config directory")?
        .join("homesync");
    Ok(config_dir)
}

/// Default location of the backup config file
pub fn default_config_path() -> Result<PathBuf> {
    Ok(homesync_config_dir()?.join("backup.toml"))
}

/// Get the homesync data directory
pub fn homesync_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| home_dir().join(".local/share"))
        .join("homesync")
}

/// Default location of the append-only run log
pub fn default_log_path() -> PathBuf {
    homesync_data_dir().join("backup.log")
}

pub fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from(shellexpand::tilde("~").into_owned()))
}

/// Expand a leading `~` in a configured path
pub fn expand_tilde(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    if raw.starts_with('~') {
        PathBuf::from(shellexpand::tilde(&raw).into_owned())
    } else {
        path.to_path_buf()
    }
}

//! Command-line configuration, read from `.oskar/config.toml`.
//!
//! ```toml
//! snapshot = "exports/okr.json"
//!
//! [filter]
//! quarters = ["Q1", "Q2"]
//! years = [2025]
//!
//! [dashboard]
//! deadline_horizon_days = 7
//!
//! [display]
//! max_title_chars = 60
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::error::OskarError;
use crate::core::filter::RawFilter;
use crate::core::metrics::DEFAULT_DEADLINE_HORIZON_DAYS;

pub const CONFIG_REL_PATH: &str = ".oskar/config.toml";

fn default_horizon() -> u32 {
    DEFAULT_DEADLINE_HORIZON_DAYS
}

fn default_max_title_chars() -> usize {
    60
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_horizon")]
    pub deadline_horizon_days: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            deadline_horizon_days: default_horizon(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_max_title_chars")]
    pub max_title_chars: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_title_chars: default_max_title_chars(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OskarConfig {
    /// Snapshot file, relative paths resolved against the config's project root.
    pub snapshot: Option<PathBuf>,
    #[serde(default)]
    pub filter: RawFilter,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

pub fn parse_config(content: &str) -> Result<OskarConfig, OskarError> {
    toml::from_str(content).map_err(|e| OskarError::ValidationError(format!("Invalid config: {e}")))
}

fn read_config(path: &Path) -> Result<OskarConfig, OskarError> {
    let content = fs::read_to_string(path).map_err(OskarError::IoError)?;
    let mut config = parse_config(&content).map_err(|e| match e {
        OskarError::ValidationError(msg) => {
            OskarError::ValidationError(format!("{} ({})", msg, path.display()))
        }
        other => other,
    })?;
    // `.oskar/config.toml` lives one level below the project root.
    let base = path
        .parent()
        .filter(|p| p.file_name().is_some_and(|n| n == ".oskar"))
        .and_then(Path::parent)
        .or_else(|| path.parent())
        .unwrap_or_else(|| Path::new("."));
    if let Some(snapshot) = config.snapshot.take() {
        config.snapshot = Some(if snapshot.is_absolute() {
            snapshot
        } else {
            base.join(snapshot)
        });
    }
    Ok(config)
}

/// Explicit path first (must exist), then `<dir>/.oskar/config.toml`, then defaults.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<OskarConfig, OskarError> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(OskarError::NotFound(format!("config file {}", path.display())));
        }
        debug!(path = %path.display(), "loading explicit config");
        return read_config(path);
    }
    let default_path = dir.join(CONFIG_REL_PATH);
    if default_path.is_file() {
        debug!(path = %default_path.display(), "loading project config");
        return read_config(&default_path);
    }
    debug!("no config file; using defaults");
    Ok(OskarConfig::default())
}

//! Settings file handling.
//!
//! The engine does not own a persistence format. This module is the
//! collaborator that keeps the user's [`PomodoroConfig`] between runs as a
//! small JSON file. Fields missing from the file take their default values,
//! and out-of-range values are rejected before the engine ever sees them.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::types::{ConfigError, PomodoroConfig};

/// Directory under the platform config dir.
const APP_DIR: &str = "pomodoro";

/// File name of the settings file.
const SETTINGS_FILE: &str = "settings.json";

/// Errors that can occur while loading or saving settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read or written.
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid JSON for a configuration.
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The settings file holds out-of-range values.
    #[error("invalid settings: {0}")]
    Invalid(#[from] ConfigError),

    /// No platform configuration directory could be determined.
    #[error("could not determine the configuration directory")]
    NoConfigDir,
}

/// Returns the default settings path (`<config dir>/pomodoro/settings.json`).
///
/// # Errors
///
/// Returns an error if the platform has no configuration directory.
pub fn default_settings_path() -> Result<PathBuf, SettingsError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
        .ok_or(SettingsError::NoConfigDir)
}

/// Loads settings from `path`.
///
/// A missing file yields the default configuration.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or validated.
pub fn load(path: &Path) -> Result<PomodoroConfig, SettingsError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(PomodoroConfig::default());
        }
        Err(source) => {
            return Err(SettingsError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config: PomodoroConfig =
        serde_json::from_str(&raw).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    config.validate()?;

    debug!(path = %path.display(), "settings loaded");
    Ok(config)
}

/// Writes `config` to `path` as pretty JSON, creating parent directories.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the file cannot be
/// written.
pub fn save(path: &Path, config: &PomodoroConfig) -> Result<(), SettingsError> {
    config.validate()?;

    let io_err = |source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let json = serde_json::to_string_pretty(config).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json + "\n").map_err(io_err)?;

    debug!(path = %path.display(), "settings saved");
    Ok(())
}

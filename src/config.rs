use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Seed for the scenario generator.
    pub seed: u64,
    /// Start of the 168-hour window simulated timestamps fall into.
    pub base_time: NaiveDateTime,
    /// Sample table used by `--sample`.
    pub sample_path: PathBuf,
    /// How many highest-severity alerts the summary and report list.
    pub top_alerts: usize,
    /// Intervention text longer than this is truncated in the action queue.
    pub action_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: 42,
            base_time: NaiveDate::from_ymd_opt(2026, 2, 1)
                .and_then(|date| date.and_hms_opt(6, 0, 0))
                .unwrap_or_default(),
            sample_path: PathBuf::from("assets/sample_signals.csv"),
            top_alerts: 3,
            action_width: 120,
        }
    }
}

impl Config {
    /// Loads the implicit config location. A missing file means defaults; a
    /// present but broken file is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Loads a TOML config the caller asked for by name. The file must exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("config loaded from {}", path.display());
        Ok(config)
    }
}

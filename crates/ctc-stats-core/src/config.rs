//! User configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::division::Division;
use crate::error::{Error, Result};
use crate::stats::{ExportFormat, DEFAULT_LIMIT, DEFAULT_MIN_POINTS, DEFAULT_MIN_RACES};

/// Configuration for ctc-stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Division used when none is given on the command line
    pub division: Division,
    /// Minimum races for a track to be ranked
    pub min_races: u32,
    /// Number of tracks in a ranking
    pub limit: usize,
    /// Player lines below this many points are hidden
    pub min_points: f64,
    /// Default export format
    pub export_format: ExportFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            division: Division::default(),
            min_races: DEFAULT_MIN_RACES,
            limit: DEFAULT_LIMIT,
            min_points: DEFAULT_MIN_POINTS,
            export_format: ExportFormat::default(),
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ctc-stats").join("config.json"))
    }

    /// Load config from disk, falling back to defaults if missing or invalid
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        if config.division.as_str().trim().is_empty() {
            return Err(Error::InvalidDivision(config.division.to_string()));
        }
        Ok(config)
    }

    /// Save config to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| Error::Config("No config directory on this platform".to_string()))?;
        self.save_to(&path)
    }

    /// Save config to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

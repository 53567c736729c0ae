//! Configuration loading and management
//!
//! Handles parsing of `.todo.toml` configuration files.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::item::{Priority, Status};
use crate::query::SortOption;
use crate::stats::DEFAULT_TREND_WINDOW_DAYS;

/// Config file looked up in the working directory when no path is given
pub const CONFIG_FILE_NAME: &str = ".todo.toml";

const STORE_FILE_NAME: &str = "items.json";
pub const MAX_TREND_DAYS: u32 = 366;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Item snapshot file; the platform data directory when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<PathBuf>,

    /// Defaults for new items and list views
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Statistics configuration
    #[serde(default)]
    pub stats: StatsConfig,

    /// Sample data configuration
    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub status: Status,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub sort: SortOption,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            status: Status::NotStarted,
            priority: Priority::Medium,
            sort: SortOption::DueDate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Days in the completion trend, ending today
    #[serde(default = "default_trend_days")]
    pub trend_days: u32,
}

fn default_trend_days() -> u32 {
    DEFAULT_TREND_WINDOW_DAYS
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            trend_days: default_trend_days(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Insert the sample items the first time an empty store is opened
    #[serde(default)]
    pub on_empty: bool,
}

impl Config {
    /// Load configuration from a `.todo.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path`, or `./.todo.toml` when no path is given. A missing file
    /// yields the defaults; an unreadable or invalid one is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Snapshot file to use: `override_path`, then `store`, then the
    /// platform data directory.
    pub fn store_path(&self, override_path: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = override_path {
            return Ok(path.to_path_buf());
        }
        if let Some(path) = &self.store {
            return Ok(path.clone());
        }
        default_store_path()
    }

    fn validate(&self) -> Result<()> {
        self.stats.validate()?;
        if let Some(store) = &self.store {
            if store.as_os_str().is_empty() {
                return Err(Error::InvalidConfig("store cannot be empty".to_string()));
            }
        }
        Ok(())
    }
}

impl StatsConfig {
    fn validate(&self) -> Result<()> {
        if self.trend_days == 0 {
            return Err(Error::InvalidConfig(
                "stats.trend_days must be >= 1".to_string(),
            ));
        }
        if self.trend_days > MAX_TREND_DAYS {
            return Err(Error::InvalidConfig(format!(
                "stats.trend_days must be <= {MAX_TREND_DAYS}"
            )));
        }
        Ok(())
    }
}

/// `items.json` under the platform data directory
pub fn default_store_path() -> Result<PathBuf> {
    ProjectDirs::from("", "", "todo-tracker")
        .map(|dirs| dirs.data_dir().join(STORE_FILE_NAME))
        .ok_or_else(|| {
            Error::InvalidConfig(
                "cannot determine a data directory; set `store` or pass --store".to_string(),
            )
        })
}

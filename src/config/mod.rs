use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::utils::{atomic, paths};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Where the seed occurrence of a submission lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SeedPlacement {
    /// The (year, month) of the entry date.
    #[default]
    EntryDate,
    /// The month currently being viewed, whatever the entry date says.
    ViewingMonth,
}

/// How a cascading delete recognizes the other occurrences of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SeriesMatching {
    /// Match on `series_id`; entries without one fall back to field matching.
    #[default]
    SeriesId,
    /// Match on (description, amount, category, recurring). Two unrelated
    /// series with equal fields are treated as one.
    Fields,
}

/// User-tunable behaviour and bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_min_year")]
    pub min_year: i32,
    #[serde(default = "Config::default_max_year")]
    pub max_year: i32,
    #[serde(default = "Config::default_category_value")]
    pub default_category: String,
    #[serde(default = "Config::default_recurrence_count_value")]
    pub default_recurrence_count: u32,
    /// Longest series a single submission may create.
    #[serde(default = "Config::default_max_recurrence_count")]
    pub max_recurrence_count: u32,
    /// Highest day-of-month used for projected occurrences.
    #[serde(default = "Config::default_day_cap")]
    pub recurrence_day_cap: u32,
    #[serde(default)]
    pub seed_placement: SeedPlacement,
    #[serde(default)]
    pub series_matching: SeriesMatching,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Directory for ledger records. Defaults to `<app data>/data`.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_year: Self::default_min_year(),
            max_year: Self::default_max_year(),
            default_category: Self::default_category_value(),
            default_recurrence_count: Self::default_recurrence_count_value(),
            max_recurrence_count: Self::default_max_recurrence_count(),
            recurrence_day_cap: Self::default_day_cap(),
            seed_placement: SeedPlacement::default(),
            series_matching: SeriesMatching::default(),
            data_dir: None,
        }
    }
}

impl Config {
    pub fn default_min_year() -> i32 {
        2020
    }

    pub fn default_max_year() -> i32 {
        2030
    }

    pub fn default_category_value() -> String {
        "Other".into()
    }

    pub fn default_recurrence_count_value() -> u32 {
        12
    }

    pub fn default_max_recurrence_count() -> u32 {
        120
    }

    pub fn default_day_cap() -> u32 {
        28
    }

    /// Normalizes a requested occurrence count: missing or zero means the default.
    pub fn recurrence_count(&self, requested: Option<u32>) -> u32 {
        match requested {
            Some(count) if count >= 1 => count,
            _ => self.default_recurrence_count.max(1),
        }
    }

    pub fn clamp_year(&self, year: i32) -> i32 {
        year.clamp(self.min_year, self.max_year.max(self.min_year))
    }

    pub fn resolve_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| paths::data_dir_in(&paths::app_data_dir()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_year > self.max_year {
            return Err(ConfigError::Invalid(format!(
                "min_year {} is after max_year {}",
                self.min_year, self.max_year
            )));
        }
        if !(1..=28).contains(&self.recurrence_day_cap) {
            return Err(ConfigError::Invalid(format!(
                "recurrence_day_cap must be between 1 and 28, got {}",
                self.recurrence_day_cap
            )));
        }
        if self.default_recurrence_count > self.max_recurrence_count {
            return Err(ConfigError::Invalid(format!(
                "default_recurrence_count {} exceeds max_recurrence_count {}",
                self.default_recurrence_count, self.max_recurrence_count
            )));
        }
        if self.default_category.trim().is_empty() {
            return Err(ConfigError::Invalid("default_category is empty".into()));
        }
        Ok(())
    }
}

/// Loads and stores [`Config`] as a JSON file.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(paths::app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: paths::config_file_in(&base),
        })
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        atomic::write_atomic(&self.path, &json)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

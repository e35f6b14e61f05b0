//! Recommender configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config value: {field} must be greater than zero")]
    Zero { field: &'static str },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    /// Directory holding bookings.csv, events.csv and weather.csv
    pub datasets_path: PathBuf,
    /// Number of persona clusters (K)
    pub personas_clusters: usize,
    /// Neighbour pool size, target guest included
    pub similar_users_count: usize,
    pub default_recommendations: usize,
    /// Length of the default event window in days
    pub default_recommendation_days: u32,
    /// Seed for persona clustering
    pub random_state: u64,
    pub default_forecast_periods: usize,
    pub default_itinerary_days: usize,
    pub default_events_per_day: usize,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            datasets_path: PathBuf::from("datasets"),
            personas_clusters: 5,
            similar_users_count: 10,
            default_recommendations: 5,
            default_recommendation_days: 30,
            random_state: 42,
            default_forecast_periods: 30,
            default_itinerary_days: 3,
            default_events_per_day: 2,
        }
    }
}

impl RecommenderConfig {
    /// Read a JSON config file; missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults when `path` is `None`, otherwise the parsed file.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn with_datasets_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.datasets_path = path.into();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.personas_clusters == 0 {
            return Err(ConfigError::Zero {
                field: "personas_clusters",
            });
        }
        if self.similar_users_count == 0 {
            return Err(ConfigError::Zero {
                field: "similar_users_count",
            });
        }
        Ok(())
    }
}

//! Routing configuration.

use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Hard ceiling on the working-set size of the conditional search.
pub const CONDITIONAL_CAPACITY_CEILING: usize = 2000;

/// Error loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    /// Values that parse but cannot be used
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Parameters for weighting and search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Stop searching after settling this many nodes in total.
    pub max_visited_nodes: usize,

    /// Initial capacity requested for the search's working sets.
    /// The conditional search never goes above
    /// [`CONDITIONAL_CAPACITY_CEILING`].
    pub requested_capacity: usize,

    /// Extra travel time charged for unfavored edges (seconds).
    pub heading_penalty_secs: i64,

    /// Fastest speed any edge can have (km/h).
    /// The beeline heuristic divides distance by this.
    pub max_speed_kmh: f64,

    /// Derating applied to conditional speed limits.
    pub speed_factor: f64,
}

impl RoutingConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        max_visited_nodes: usize,
        requested_capacity: usize,
        heading_penalty_secs: i64,
        max_speed_kmh: f64,
        speed_factor: f64,
    ) -> Self {
        Self {
            max_visited_nodes,
            requested_capacity,
            heading_penalty_secs,
            max_speed_kmh,
            speed_factor,
        }
    }

    /// Read a JSON configuration file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: RoutingConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the weighting cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_speed_kmh.is_finite() && self.max_speed_kmh > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "max_speed_kmh must be positive, got {}",
                self.max_speed_kmh
            )));
        }
        if !(self.speed_factor > 0.0 && self.speed_factor <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "speed_factor must be in (0, 1], got {}",
                self.speed_factor
            )));
        }
        if self.heading_penalty_secs < 0 {
            return Err(ConfigError::Invalid(format!(
                "heading_penalty_secs must not be negative, got {}",
                self.heading_penalty_secs
            )));
        }
        Ok(())
    }

    /// Returns the heading penalty as a Duration.
    pub fn heading_penalty(&self) -> Duration {
        Duration::seconds(self.heading_penalty_secs)
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            max_visited_nodes: usize::MAX,
            requested_capacity: 150_000,
            heading_penalty_secs: 300, // 5 minutes
            max_speed_kmh: 140.0,
            speed_factor: 0.9,
        }
    }
}

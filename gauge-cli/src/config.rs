//! Configuration loading from gauge.toml
//!
//! Gauge configuration can be specified in a `gauge.toml` file in the project root.
//! The configuration is automatically discovered by walking up from the current directory.
//! Command-line flags override file values.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "gauge.toml";

/// Errors loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema
    #[error("invalid {}: {source}", .path.display())]
    Parse {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: toml::de::Error,
    },

    /// A duration string could not be parsed
    #[error("invalid duration {0:?}, expected e.g. \"30\", \"500ms\" or \"2m\"")]
    Duration(String),
}

/// Gauge configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GaugeConfig {
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Runner configuration for benchmark execution
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RunnerConfig {
    /// Target relative standard deviation, in percent
    #[serde(default)]
    pub stdev: Option<f64>,
    /// Time budget per benchmark (e.g. "30s", "2m"); unbounded when absent
    #[serde(default)]
    pub timeout: Option<String>,
    /// Requested parallelism; benchmarks refuse anything but 1
    #[serde(default)]
    pub jobs: Option<usize>,
    /// Trials required before a timeout may produce an estimate
    #[serde(default)]
    pub min_trials: Option<u32>,
    /// Clock: "monotonic" or "cpu"
    #[serde(default)]
    pub clock: Option<String>,
    /// Pin the runner thread to this CPU
    #[serde(default)]
    pub pin_cpu: Option<usize>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct OutputConfig {
    /// Write results to this CSV file instead of the console
    #[serde(default)]
    pub csv: Option<PathBuf>,
}

impl GaugeConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Try to discover and load configuration by walking up from `start`
    pub fn discover_from(start: impl AsRef<Path>) -> Result<Option<Self>, ConfigError> {
        let mut dir = start.as_ref().to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                tracing::debug!(path = %config_path.display(), "loading configuration");
                return Self::load(&config_path).map(Some);
            }
            if !dir.pop() {
                return Ok(None);
            }
        }
    }

    /// Try to discover and load configuration by walking up from the current directory
    pub fn discover() -> Result<Option<Self>, ConfigError> {
        match std::env::current_dir() {
            Ok(dir) => Self::discover_from(dir),
            Err(_) => Ok(None),
        }
    }

    /// Parse a duration string ("3s", "500ms", "2m"). A bare number is seconds.
    pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ConfigError::Duration(s.to_string()));
        }

        // Find where the number ends and unit begins
        let (num_part, unit_part) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "s"));

        let value: f64 = num_part
            .trim()
            .parse()
            .map_err(|_| ConfigError::Duration(s.to_string()))?;
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::Duration(s.to_string()));
        }

        let multiplier: u64 = match unit_part.to_lowercase().as_str() {
            "ns" => 1,
            "us" | "µs" | "μs" => 1_000,
            "ms" => 1_000_000,
            "s" | "sec" => 1_000_000_000,
            "m" | "min" => 60_000_000_000,
            _ => return Err(ConfigError::Duration(s.to_string())),
        };

        Ok(Duration::from_nanos((value * multiplier as f64).round() as u64))
    }
}

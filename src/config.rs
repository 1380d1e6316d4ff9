// src/config.rs
//
// Configuration file parsing for the compute worker.
// Every section and field is optional; an empty file yields the defaults.

use crate::optimizer::SharpeConfig;
use crate::pricing::GbmConfig;
use serde::Deserialize;
use std::fs;
use std::path::Path;

// =============================================================================
// Configuration Types
// =============================================================================

/// Root configuration structure.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Worker-wide settings
    #[serde(default)]
    pub global: GlobalConfig,
    /// Price-path simulator settings
    #[serde(default)]
    pub simulation: GbmConfig,
    /// Portfolio optimizer settings
    #[serde(default)]
    pub optimizer: SharpeConfig,
}

/// Global configuration settings.
#[derive(Debug, Deserialize)]
pub struct GlobalConfig {
    /// Log level used when RUST_LOG is not set
    pub log_level: Option<String>,
    /// Capacity of the request and response queues
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    /// Fixed seed for reproducible runs (None = OS entropy)
    pub seed: Option<u64>,
}

fn default_channel_capacity() -> usize {
    64
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: None,
            channel_capacity: default_channel_capacity(),
            seed: None,
        }
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(s: &str) -> Result<Self, String> {
        toml::from_str(s).map_err(|e| format!("Failed to parse config: {}", e))
    }
}

// =============================================================================
// Default Configuration
// =============================================================================

/// Returns a default configuration string for documentation.
pub fn default_config_template() -> &'static str {
    r#"# Compute Worker Configuration
#
# All settings are optional; the values below are the defaults.

[global]
# Log level when RUST_LOG is not set (error, warn, info, debug, trace)
log_level = "info"

# Capacity of the request and response queues
channel_capacity = 64

# Fixed seed for reproducible simulations (omit for OS entropy)
# seed = 42

[simulation]
# Time steps per year; each simulated step is 1/trading_days_per_year
trading_days_per_year = 252

# Number of full paths returned for visualization
sample_paths = 50

[optimizer]
# Random candidate allocations evaluated per request
search_iterations = 5000
"#
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_config() {
        let config_str = r#"
            [global]
            log_level = "debug"
            seed = 7

            [optimizer]
            search_iterations = 100
        "#;

        let config = Config::from_str(config_str).unwrap();
        assert_eq!(config.global.log_level.as_deref(), Some("debug"));
        assert_eq!(config.global.seed, Some(7));
        assert_eq!(config.global.channel_capacity, 64);
        assert_eq!(config.optimizer.search_iterations, 100);
        assert_eq!(config.simulation, GbmConfig::default());
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.global.seed, None);
        assert_eq!(config.simulation.trading_days_per_year, 252.0);
        assert_eq!(config.simulation.sample_paths, 50);
        assert_eq!(config.optimizer.search_iterations, 5000);
    }

    #[test]
    fn test_template_parses_to_defaults() {
        let config = Config::from_str(default_config_template()).unwrap();
        assert_eq!(config.global.log_level.as_deref(), Some("info"));
        assert_eq!(config.simulation, GbmConfig::default());
        assert_eq!(config.optimizer, SharpeConfig::default());
    }

    #[test]
    fn test_invalid_config_reports_error() {
        let err = Config::from_str("[simulation]\nsample_paths = \"lots\"").unwrap_err();
        assert!(err.starts_with("Failed to parse config"));

        let err = Config::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(err.starts_with("Failed to read config file"));
    }
}

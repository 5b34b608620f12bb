//! TOML configuration file support.
//!
//! Connection settings and battery-test defaults can live in a file instead of
//! being repeated on every invocation:
//!
//! ```toml
//! # load.toml
//! [connection]
//! serial_port = "/dev/ttyACM0"
//! serial_speed = 115200
//!
//! [battery_test]
//! sampling_interval = 10.0
//! file_base_name = "cell-a"
//! ```
//!
//! Command-line flags and environment variables take precedence over the file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Root configuration structure for load.toml files.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Serial connection settings.
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// Defaults for the battery-test command.
    #[serde(default)]
    pub battery_test: BatteryTestConfig,
}

/// Serial connection settings.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionConfig {
    /// Serial port device, e.g. /dev/ttyACM0 or COM3.
    pub serial_port: Option<String>,

    /// Baud rate.
    pub serial_speed: Option<u32>,
}

/// Defaults for the battery-test command.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatteryTestConfig {
    /// Seconds between samples.
    pub sampling_interval: Option<f64>,

    /// Base name for the CSV and PNG report files.
    pub file_base_name: Option<String>,
}

impl Config {
    /// Load configuration from a TOML file, or defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

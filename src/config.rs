//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the
//! buoy-config.toml file. It provides the mapping from buoy identifier to
//! anchored reference coordinates, plus the generation interval for the
//! synthetic wave feed.

use crate::monitor::DEFAULT_INTERVAL;
use crate::BuoyReference;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Application configuration loaded from buoy-config.toml
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Wave monitor configuration
    pub monitor: MonitorConfig,
    /// Monitored buoys and their anchored positions
    pub buoys: Vec<BuoyConfig>,
}

/// Settings shared by all wave monitors
#[derive(Debug, Deserialize, Serialize)]
pub struct MonitorConfig {
    /// Seconds between generated samples, unless a buoy overrides it
    pub interval_secs: u64,
}

/// One monitored buoy
#[derive(Debug, Deserialize, Serialize)]
pub struct BuoyConfig {
    /// Record identifier, e.g. "B1"
    pub id: String,
    /// Human-readable name for the deployment site
    pub name: String,
    /// Anchored latitude in degrees, [-90, 90]
    pub latitude: f64,
    /// Anchored longitude in degrees, [-180, 180]
    pub longitude: f64,
    /// Per-buoy override of the shared interval
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            monitor: MonitorConfig {
                interval_secs: DEFAULT_INTERVAL.as_secs(),
            },
            buoys: vec![BuoyConfig {
                id: "B1".to_string(),
                name: "San Miguel Basin".to_string(),
                latitude: 34.30115,
                longitude: -120.6133,
                interval_secs: None,
            }],
        }
    }
}

impl Config {
    /// Load configuration from buoy-config.toml
    /// Falls back to default configuration if the file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path("buoy-config.toml")
    }

    /// Load configuration from the specified path
    /// Falls back to default configuration if the file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!(buoys = config.buoys.len(), "loaded buoy configuration");
                    config
                }
                Err(error) => {
                    warn!(%error, "invalid config file format, using default configuration");
                    Self::default()
                }
            },
            Err(_) => {
                info!("no config file found, using default configuration");
                Self::default()
            }
        }
    }

    /// Save the current configuration to buoy-config.toml
    pub fn save(&self) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write("buoy-config.toml", contents)?;
        info!("configuration saved to buoy-config.toml");
        Ok(())
    }

    /// Effective sample interval for one buoy, never shorter than a second.
    pub fn interval_for(&self, buoy: &BuoyConfig) -> Duration {
        let secs = buoy.interval_secs.unwrap_or(self.monitor.interval_secs).max(1);
        Duration::from_secs(secs)
    }
}

impl BuoyConfig {
    /// The reference handed to this buoy's monitor loop.
    pub fn reference(&self) -> BuoyReference {
        BuoyReference::new(self.id.clone(), self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.monitor.interval_secs, 60);
        assert_eq!(config.buoys.len(), 1);
        assert_eq!(config.buoys[0].id, "B1");
        assert_eq!(config.buoys[0].latitude, 34.30115);
        assert_eq!(config.buoys[0].longitude, -120.6133);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.monitor.interval_secs, parsed.monitor.interval_secs);
        assert_eq!(config.buoys[0].id, parsed.buoys[0].id);
        assert_eq!(config.buoys[0].latitude, parsed.buoys[0].latitude);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let config = Config::load_from_path("/nonexistent/path");
        // Should fallback to default
        assert_eq!(config.buoys[0].id, "B1");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("buoy-config.toml");
        fs::write(
            &path,
            r#"
[monitor]
interval_secs = 15

[[buoys]]
id = "B7"
name = "Jonesport"
latitude = 44.6
longitude = -67.3
interval_secs = 5

[[buoys]]
id = "B8"
name = "Monhegan"
latitude = 43.8
longitude = -69.3
"#,
        )
        .unwrap();

        let config = Config::load_from_path(&path);
        assert_eq!(config.monitor.interval_secs, 15);
        assert_eq!(config.buoys.len(), 2);
        assert_eq!(config.interval_for(&config.buoys[0]), Duration::from_secs(5));
        assert_eq!(config.interval_for(&config.buoys[1]), Duration::from_secs(15));
    }

    #[test]
    fn test_interval_never_below_one_second() {
        let mut config = Config::default();
        config.monitor.interval_secs = 0;
        assert_eq!(config.interval_for(&config.buoys[0]), Duration::from_secs(1));
    }

    #[test]
    fn test_reference_carries_anchor_coordinates() {
        let config = Config::default();
        let reference = config.buoys[0].reference();
        assert_eq!(reference.id, "B1");
        assert_eq!(reference.latitude, 34.30115);
        assert_eq!(reference.longitude, -120.6133);
    }
}

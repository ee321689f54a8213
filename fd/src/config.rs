//! fleetd configuration types and loading

use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::coordinator::CoordinatorConfig;
use crate::unit::UnitConfig;

/// Main fleetd configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Coordinator timing, capacity and probabilities
    pub coordinator: CoordinatorConfig,

    /// Behaviour shared by every unit
    pub unit: UnitConfig,

    /// Fleet size and seeding
    pub fleet: FleetConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Rejects probabilities outside `[0, 1]` and zero-sized quantities that
    /// would leave the fleet unable to make progress.
    pub fn validate(&self) -> Result<()> {
        check_probability("coordinator.arrival-threshold", self.coordinator.arrival_threshold)?;
        check_probability("coordinator.diversion-probability", self.coordinator.diversion_probability)?;
        check_probability("unit.drop-probability", self.unit.drop_probability)?;

        if self.coordinator.capacity == 0 {
            return Err(eyre!("coordinator.capacity must be at least 1"));
        }
        if self.coordinator.tick_ms == 0 {
            return Err(eyre!("coordinator.tick-ms must be at least 1"));
        }
        if self.coordinator.arrival_tick_ms == 0 {
            return Err(eyre!("coordinator.arrival-tick-ms must be at least 1"));
        }
        if self.fleet.status_interval_ms == 0 {
            return Err(eyre!("fleet.status-interval-ms must be at least 1"));
        }
        if self.coordinator.activity_capacity == 0 {
            return Err(eyre!("coordinator.activity-capacity must be at least 1"));
        }
        if self.unit.movement_steps == 0 {
            return Err(eyre!("unit.movement-steps must be at least 1"));
        }
        if self.fleet.units == 0 {
            return Err(eyre!("fleet.units must be at least 1"));
        }
        if self.coordinator.channel_buffer == 0 || self.unit.channel_buffer == 0 {
            return Err(eyre!("channel-buffer must be at least 1"));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Project-local: .fleetd.yml
        let local_config = PathBuf::from(".fleetd.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // User: ~/.config/fleetd/fleetd.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("fleetd").join("fleetd.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

fn check_probability(key: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(eyre!("{} must be within [0, 1], got {}", key, value))
    }
}

/// Fleet composition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetConfig {
    /// Number of units to launch
    #[serde(default = "default_units")]
    pub units: usize,

    /// Units are named `<prefix>-1` through `<prefix>-N`
    #[serde(default = "default_unit_prefix", rename = "unit-prefix")]
    pub unit_prefix: String,

    /// Seed for reproducible runs; unit `i` uses `seed + i`
    #[serde(default)]
    pub seed: Option<u64>,

    /// Period between status lines in milliseconds
    #[serde(default = "default_status_interval_ms", rename = "status-interval-ms")]
    pub status_interval_ms: u64,
}

fn default_units() -> usize {
    debug!("default_units: called");
    3
}

fn default_unit_prefix() -> String {
    debug!("default_unit_prefix: called");
    "unit".to_string()
}

fn default_status_interval_ms() -> u64 {
    debug!("default_status_interval_ms: called");
    5000
}

impl Default for FleetConfig {
    fn default() -> Self {
        debug!("FleetConfig::default: called");
        Self {
            units: default_units(),
            unit_prefix: default_unit_prefix(),
            seed: None,
            status_interval_ms: default_status_interval_ms(),
        }
    }
}

impl FleetConfig {
    pub fn status_interval(&self) -> Duration {
        Duration::from_millis(self.status_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.coordinator.capacity, 10);
        assert_eq!(config.coordinator.diversion_probability, 0.3);
        assert_eq!(config.unit.movement_steps, 5);
        assert_eq!(config.fleet.units, 3);
        assert_eq!(config.fleet.unit_prefix, "unit");
        assert!(config.fleet.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
coordinator:
  address: hub
  tick-ms: 250
  receive-timeout-ms: 500
  capacity: 4
  diversion-probability: 0.0

unit:
  drop-probability: 0.5
  movement-steps: 10
  step-ms: 20

fleet:
  units: 7
  unit-prefix: cart
  seed: 42
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.coordinator.address, "hub");
        assert_eq!(config.coordinator.tick_ms, 250);
        assert_eq!(config.coordinator.receive_timeout_ms, 500);
        assert_eq!(config.coordinator.capacity, 4);
        assert_eq!(config.coordinator.diversion_probability, 0.0);
        assert_eq!(config.unit.drop_probability, 0.5);
        assert_eq!(config.unit.movement_steps, 10);
        assert_eq!(config.fleet.units, 7);
        assert_eq!(config.fleet.unit_prefix, "cart");
        assert_eq!(config.fleet.seed, Some(42));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
unit:
  step-ms: 5
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.unit.step_ms, 5);
        assert_eq!(config.unit.movement_steps, 5);
        assert_eq!(config.coordinator.arrival_threshold, 0.99);
        assert_eq!(config.fleet.status_interval_ms, 5000);
    }

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fleet:\n  units: 2\n  seed: 9").unwrap();

        let path = file.path().to_path_buf();
        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.fleet.units, 2);
        assert_eq!(config.fleet.seed, Some(9));
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_load_invalid_yaml_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "coordinator: [not, a, map]").unwrap();
        assert!(Config::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.unit.drop_probability = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.coordinator.diversion_probability = -0.1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.coordinator.capacity = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.unit.movement_steps = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.coordinator.tick_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("coordinator.tick-ms"));

        let mut config = Config::default();
        config.coordinator.arrival_tick_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("coordinator.arrival-tick-ms"));

        let mut config = Config::default();
        config.fleet.status_interval_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("fleet.status-interval-ms"));

        let mut config = Config::default();
        config.fleet.units = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("fleet.units"));
    }
}

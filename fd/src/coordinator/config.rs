//! Coordinator configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Coordinator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Transport address units report to
    #[serde(default = "default_address")]
    pub address: String,

    /// Period between dispatch ticks in milliseconds
    #[serde(default = "default_tick_ms", rename = "tick-ms")]
    pub tick_ms: u64,

    /// Bounded wait for an inbound message per dispatch tick
    #[serde(default = "default_receive_timeout_ms", rename = "receive-timeout-ms")]
    pub receive_timeout_ms: u64,

    /// Period between arrival ticks in milliseconds
    #[serde(default = "default_arrival_tick_ms", rename = "arrival-tick-ms")]
    pub arrival_tick_ms: u64,

    /// A package arrives when the arrival draw exceeds this value
    #[serde(default = "default_arrival_threshold", rename = "arrival-threshold")]
    pub arrival_threshold: f64,

    /// Maximum number of live packages
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Chance that a task request is diverted to inspection
    #[serde(default = "default_diversion_probability", rename = "diversion-probability")]
    pub diversion_probability: f64,

    /// Number of recent messages kept in the activity log
    #[serde(default = "default_activity_capacity", rename = "activity-capacity")]
    pub activity_capacity: usize,

    /// Mailbox size for inbound unit messages
    #[serde(default = "default_channel_buffer", rename = "channel-buffer")]
    pub channel_buffer: usize,
}

fn default_address() -> String {
    debug!("default_address: called");
    "coordinator".to_string()
}

fn default_tick_ms() -> u64 {
    debug!("default_tick_ms: called");
    1000
}

fn default_receive_timeout_ms() -> u64 {
    debug!("default_receive_timeout_ms: called");
    5000
}

fn default_arrival_tick_ms() -> u64 {
    debug!("default_arrival_tick_ms: called");
    1000
}

fn default_arrival_threshold() -> f64 {
    debug!("default_arrival_threshold: called");
    0.99
}

fn default_capacity() -> usize {
    debug!("default_capacity: called");
    10
}

fn default_diversion_probability() -> f64 {
    debug!("default_diversion_probability: called");
    0.3
}

fn default_activity_capacity() -> usize {
    debug!("default_activity_capacity: called");
    11
}

fn default_channel_buffer() -> usize {
    debug!("default_channel_buffer: called");
    1000
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        debug!("CoordinatorConfig::default: called");
        Self {
            address: "coordinator".to_string(),
            tick_ms: 1000,
            receive_timeout_ms: 5000,
            arrival_tick_ms: 1000,
            arrival_threshold: 0.99,
            capacity: 10,
            diversion_probability: 0.3,
            activity_capacity: 11,
            channel_buffer: 1000,
        }
    }
}

impl CoordinatorConfig {
    /// Dispatch tick period as a Duration
    pub fn tick(&self) -> Duration {
        debug!(tick_ms = %self.tick_ms, "CoordinatorConfig::tick: called");
        Duration::from_millis(self.tick_ms)
    }

    /// Receive timeout as a Duration
    pub fn receive_timeout(&self) -> Duration {
        debug!(receive_timeout_ms = %self.receive_timeout_ms, "CoordinatorConfig::receive_timeout: called");
        Duration::from_millis(self.receive_timeout_ms)
    }

    /// Arrival tick period as a Duration
    pub fn arrival_tick(&self) -> Duration {
        debug!(arrival_tick_ms = %self.arrival_tick_ms, "CoordinatorConfig::arrival_tick: called");
        Duration::from_millis(self.arrival_tick_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CoordinatorConfig::default();
        assert_eq!(config.address, "coordinator");
        assert_eq!(config.tick_ms, 1000);
        assert_eq!(config.receive_timeout_ms, 5000);
        assert_eq!(config.arrival_threshold, 0.99);
        assert_eq!(config.capacity, 10);
        assert_eq!(config.diversion_probability, 0.3);
        assert_eq!(config.activity_capacity, 11);
    }

    #[test]
    fn test_durations() {
        let config = CoordinatorConfig {
            tick_ms: 250,
            receive_timeout_ms: 40,
            ..Default::default()
        };
        assert_eq!(config.tick(), Duration::from_millis(250));
        assert_eq!(config.receive_timeout(), Duration::from_millis(40));
        assert_eq!(config.arrival_tick(), Duration::from_secs(1));
    }
}

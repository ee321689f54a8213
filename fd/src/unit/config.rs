//! Unit configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-unit behaviour shared by every unit in the fleet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitConfig {
    /// How long to wait for a reply to a task request
    #[serde(default = "default_receive_timeout_ms", rename = "receive-timeout-ms")]
    pub receive_timeout_ms: u64,

    /// Chance of dropping the package on each step toward the terminal
    #[serde(default = "default_drop_probability", rename = "drop-probability")]
    pub drop_probability: f64,

    /// Number of progress reports per trip
    #[serde(default = "default_movement_steps", rename = "movement-steps")]
    pub movement_steps: u32,

    /// Delay after each movement step in milliseconds
    #[serde(default = "default_step_ms", rename = "step-ms")]
    pub step_ms: u64,

    /// Mailbox size for coordinator replies
    #[serde(default = "default_channel_buffer", rename = "channel-buffer")]
    pub channel_buffer: usize,
}

fn default_receive_timeout_ms() -> u64 {
    5000
}

fn default_drop_probability() -> f64 {
    0.1
}

fn default_movement_steps() -> u32 {
    5
}

fn default_step_ms() -> u64 {
    1000
}

fn default_channel_buffer() -> usize {
    100
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            receive_timeout_ms: 5000,
            drop_probability: 0.1,
            movement_steps: 5,
            step_ms: 1000,
            channel_buffer: 100,
        }
    }
}

impl UnitConfig {
    pub fn receive_timeout(&self) -> Duration {
        Duration::from_millis(self.receive_timeout_ms)
    }

    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(self.step_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = UnitConfig::default();
        assert_eq!(config.receive_timeout(), Duration::from_secs(5));
        assert_eq!(config.drop_probability, 0.1);
        assert_eq!(config.movement_steps, 5);
        assert_eq!(config.step_interval(), Duration::from_secs(1));
    }
}

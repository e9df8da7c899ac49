//! Dispatch settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// `[dispatch]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Log filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Rate at which held directions are re-asserted
    #[serde(default = "default_tick_rate")]
    pub tick_rate_hz: u32,

    /// Tolerance for "unit length" direction vectors
    #[serde(default = "default_axis_epsilon")]
    pub axis_epsilon: f32,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_tick_rate() -> u32 {
    60
}

fn default_axis_epsilon() -> f32 {
    0.05
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            tick_rate_hz: default_tick_rate(),
            axis_epsilon: default_axis_epsilon(),
        }
    }
}

impl DispatchConfig {
    /// Time between ticks; a zero rate is clamped to 1 Hz
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.tick_rate_hz.max(1)))
    }
}

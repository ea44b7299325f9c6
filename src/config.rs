//! Node configuration parameters
//!
//! All tunable parameters for both node types.  Defaults are the calibrated
//! reference values; any of them can be overridden by a config blob stored
//! in NVS (see [`NvsAdapter`](crate::adapters::nvs::NvsAdapter)).

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::control::servo::PulseSpec;

/// Core node configuration.  Each binary only reads its own section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    pub awning: AwningConfig,
    pub sensor: SensorConfig,
}

/// Awning node: servo calibration and boot position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwningConfig {
    /// Pulse timing and PWM resolution of the servo channel.
    pub pulse: PulseSpec,
    /// Position applied at boot, before any remote command arrives.
    pub default_engaged: bool,
}

impl Default for AwningConfig {
    fn default() -> Self {
        Self {
            pulse: PulseSpec::REFERENCE,
            default_engaged: false,
        }
    }
}

/// Rain sensor node: sleep-cycle timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Timer wake period while it is raining (µs).
    pub rain_recheck_us: u64,
    /// Wait between reporting and cutting power, so the report can leave
    /// the radio (ms).
    pub settle_delay_ms: u32,
    /// Wait after boot before sampling, so the platform link is up (ms).
    pub startup_settle_ms: u32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            rain_recheck_us: 10 * 1_000_000, // 10 s
            settle_delay_ms: 5_000,
            startup_settle_ms: 5_000,
        }
    }
}

impl NodeConfig {
    /// Range-check every field.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.awning.pulse.validate()?;

        let s = &self.sensor;
        if !(1_000_000..=86_400_000_000).contains(&s.rain_recheck_us) {
            return Err(ConfigError::ValidationFailed(
                "rain_recheck_us must be 1 s – 24 h",
            ));
        }
        if s.settle_delay_ms > 60_000 {
            return Err(ConfigError::ValidationFailed(
                "settle_delay_ms must be at most 60 s",
            ));
        }
        if s.startup_settle_ms > 60_000 {
            return Err(ConfigError::ValidationFailed(
                "startup_settle_ms must be at most 60 s",
            ));
        }
        Ok(())
    }
}

//! Shared mutable context threaded through every cycle handler.
//!
//! `CycleContext` is the blackboard for one wake cycle.  The service writes
//! the results of hardware I/O into it (`raw_high`, `reported`,
//! `wake_armed`); the state handlers write the decisions (`reading`,
//! `wake`).

use super::{Reading, WakeSource};
use crate::config::SensorConfig;

#[derive(Debug, Clone)]
pub struct CycleContext {
    // --- Inputs, fixed for the cycle ---
    /// Reading reported by the previous cycle (retained across deep sleep).
    pub previous: bool,
    /// Sensor GPIO, used for the GPIO wake source.
    pub sensor_pin: i32,
    /// Timer wake period while raining (µs).
    pub rain_recheck_us: u64,

    // --- Written by the service after I/O ---
    /// Raw pin level sampled this cycle.
    pub raw_high: Option<bool>,
    /// Report sent, flag persisted, settle delay elapsed.
    pub reported: bool,
    /// Stale wake sources disabled and the new one armed.
    pub wake_armed: bool,

    // --- Written by state handlers ---
    /// Classified reading and the sink path it takes.
    pub reading: Option<Reading>,
    /// Wake source selected for this cycle.
    pub wake: Option<WakeSource>,
}

impl CycleContext {
    pub fn new(previous: bool, sensor_pin: i32, config: &SensorConfig) -> Self {
        Self {
            previous,
            sensor_pin,
            rain_recheck_us: config.rain_recheck_us,
            raw_high: None,
            reported: false,
            wake_armed: false,
            reading: None,
            wake: None,
        }
    }
}

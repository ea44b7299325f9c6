//! Blocking delay adapter.
//!
//! - **`target_os = "espidf"`**: yields to the scheduler through
//!   `esp_idf_hal::delay::FreeRtos` (tick resolution), so the network
//!   tasks keep running while the cycle waits for its report to flush.
//! - **`not(target_os = "espidf")`**: `std::thread::sleep` for host-side
//!   simulation.

use embedded_hal::delay::DelayNs;

/// Task-level delay for the settle waits of a wake cycle.
#[derive(Debug, Default, Clone, Copy)]
pub struct TaskDelay;

impl TaskDelay {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_os = "espidf")]
impl DelayNs for TaskDelay {
    fn delay_ns(&mut self, ns: u32) {
        esp_idf_hal::delay::FreeRtos.delay_ns(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        esp_idf_hal::delay::FreeRtos::delay_ms(ms);
    }
}

#[cfg(not(target_os = "espidf"))]
impl DelayNs for TaskDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}

//! Hardware adapters: bridge real peripherals to domain port traits.
//!
//! [`LedcServoChannel`] exposes the servo's LEDC channel as a [`PwmPort`];
//! [`DeepSleepController`] exposes the sleep API as a [`SleepPort`].
//! On non-espidf targets the underlying drivers use cfg-gated simulation
//! stubs.

use log::info;

use crate::app::ports::{PwmPort, SleepPort, WakeCause};
use crate::drivers::{hw_init, sleep};
use crate::error::HwInitError;
use crate::fsm::{WakeKind, WakeLevel};
use crate::pins;

// ── PwmPort ───────────────────────────────────────────────────

/// The single LEDC channel reserved for the servo.
pub struct LedcServoChannel {
    channel: u32,
}

impl LedcServoChannel {
    pub fn new() -> Self {
        Self {
            channel: pins::SERVO_LEDC_CHANNEL,
        }
    }
}

impl Default for LedcServoChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl PwmPort for LedcServoChannel {
    fn configure_channel(
        &mut self,
        pin: i32,
        frequency_hz: u32,
        resolution_bits: u32,
    ) -> Result<(), HwInitError> {
        hw_init::init_servo_ledc(pin, frequency_hz, resolution_bits)
    }

    fn set_duty(&mut self, duty: u32) {
        hw_init::ledc_stage(self.channel, duty);
    }

    fn commit(&mut self) {
        hw_init::ledc_commit(self.channel);
    }
}

// ── SleepPort ─────────────────────────────────────────────────

/// Owns the chip's deep-sleep configuration for the cycle.
pub struct DeepSleepController {
    cause: WakeCause,
}

impl DeepSleepController {
    /// Capture the wake cause once, at boot.
    pub fn new() -> Self {
        let cause = sleep::wake_cause();
        info!("Wake cause: {:?}", cause);
        Self { cause }
    }
}

impl Default for DeepSleepController {
    fn default() -> Self {
        Self::new()
    }
}

impl SleepPort for DeepSleepController {
    fn disable_wake_source(&mut self, kind: WakeKind) {
        sleep::disable_wake_source(kind);
    }

    fn enable_timer_wake(&mut self, duration_us: u64) {
        sleep::enable_timer_wake(duration_us);
    }

    fn enable_edge_wake(&mut self, pin: i32, level: WakeLevel) {
        sleep::enable_gpio_wake(pin, level);
    }

    fn enter_deep_sleep(&mut self) -> ! {
        sleep::deep_sleep_start()
    }

    fn wake_cause(&self) -> WakeCause {
        self.cause
    }
}

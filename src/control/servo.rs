//! Two-position servo mapping for the awning actuator.
//!
//! A positional servo reads the width of a ~50 Hz pulse: 500 µs is 0°,
//! 2500 µs is 180°.  The awning only ever uses the two end stops, so the
//! logical state maps to an angle, the angle to a pulse width, and the
//! pulse width to an LEDC duty count:
//!
//! ```text
//!  state ──▶ angle {0, 180} ──▶ pulse_us ──▶ duty = pulse_us · 2^bits / period_us
//! ```
//!
//! All arithmetic is integer and truncating.  With the reference constants
//! (500–2500 µs, 50 Hz, 13-bit) the two duties are exactly 204 and 1024.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::{ConfigError, PwmPort};
use crate::error::HwInitError;

/// Angle commanded when the awning is disengaged.
pub const ANGLE_DISENGAGED: u32 = 0;
/// Angle commanded when the awning is engaged.
pub const ANGLE_ENGAGED: u32 = 180;

/// Pulse timing of the servo and resolution of the PWM timer driving it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PulseSpec {
    /// Pulse width at 0° (µs).
    pub min_pulse_us: u32,
    /// Pulse width at 180° (µs).
    pub max_pulse_us: u32,
    /// PWM frame rate (Hz).
    pub frequency_hz: u32,
    /// LEDC timer resolution; the duty range is `0..2^resolution_bits`.
    pub resolution_bits: u32,
}

impl PulseSpec {
    /// SG90-class hobby servo on a 13-bit, 50 Hz LEDC timer.
    pub const REFERENCE: Self = Self {
        min_pulse_us: 500,
        max_pulse_us: 2500,
        frequency_hz: 50,
        resolution_bits: 13,
    };

    /// Length of one PWM frame in microseconds.
    ///
    /// The frame math below assumes a spec that passed
    /// [`validate`](Self::validate); a zero `frequency_hz` or a
    /// `resolution_bits` of 32 or more panics.
    pub const fn period_us(&self) -> u32 {
        1_000_000 / self.frequency_hz
    }

    /// Number of duty steps in one frame (`2^resolution_bits`).
    pub const fn steps(&self) -> u32 {
        1 << self.resolution_bits
    }

    /// Pulse width for `angle` degrees (0–180), truncated toward zero.
    pub const fn pulse_width_us(&self, angle: u32) -> u32 {
        let span = self.max_pulse_us.saturating_sub(self.min_pulse_us);
        self.min_pulse_us + angle * span / 180
    }

    /// Duty count for a pulse width.  Computed with 64-bit intermediates;
    /// [`validate`](Self::validate) guarantees the result fits in `u32`.
    pub const fn duty_for_pulse(&self, pulse_width_us: u32) -> u32 {
        ((pulse_width_us as u64 * self.steps() as u64) / self.period_us() as u64) as u32
    }

    /// Duty count for a logical state.  Pure and deterministic.
    pub const fn duty_for(&self, engaged: bool) -> u32 {
        self.duty_for_pulse(self.pulse_width_us(angle_for(engaged)))
    }

    /// Range-check every field.  Rejects rather than clamps.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(20..=400).contains(&self.frequency_hz) {
            return Err(ConfigError::ValidationFailed("frequency_hz must be 20–400"));
        }
        if !(1..=20).contains(&self.resolution_bits) {
            return Err(ConfigError::ValidationFailed("resolution_bits must be 1–20"));
        }
        if self.min_pulse_us >= self.max_pulse_us {
            return Err(ConfigError::ValidationFailed(
                "min_pulse_us must be < max_pulse_us",
            ));
        }
        if self.max_pulse_us >= self.period_us() {
            return Err(ConfigError::ValidationFailed(
                "max_pulse_us must be shorter than the PWM period",
            ));
        }
        if u64::from(self.max_pulse_us) * u64::from(self.steps()) > u64::from(u32::MAX) {
            return Err(ConfigError::ValidationFailed(
                "max_pulse_us * 2^resolution_bits overflows u32",
            ));
        }
        Ok(())
    }
}

impl Default for PulseSpec {
    fn default() -> Self {
        Self::REFERENCE
    }
}

/// Binary position: engaged → 180°, disengaged → 0°.
pub const fn angle_for(engaged: bool) -> u32 {
    if engaged { ANGLE_ENGAGED } else { ANGLE_DISENGAGED }
}

// ───────────────────────────────────────────────────────────────
// ServoPositionMapper
// ───────────────────────────────────────────────────────────────

/// Owns the servo's PWM channel and commits duty values to it.
///
/// The channel must be configured with [`initialize`](Self::initialize)
/// before any position is applied; writes to an unconfigured channel are
/// refused.
pub struct ServoPositionMapper<P: PwmPort> {
    pwm: P,
    spec: PulseSpec,
    pin: i32,
    initialized: bool,
    last_duty: Option<u32>,
}

impl<P: PwmPort> ServoPositionMapper<P> {
    /// `spec` must already be validated.
    pub fn new(pwm: P, spec: PulseSpec, pin: i32) -> Self {
        Self {
            pwm,
            spec,
            pin,
            initialized: false,
            last_duty: None,
        }
    }

    /// One-time channel setup.  Calling it again after success is a no-op.
    pub fn initialize(&mut self) -> Result<(), HwInitError> {
        if self.initialized {
            debug!("servo: channel already configured");
            return Ok(());
        }
        self.pwm
            .configure_channel(self.pin, self.spec.frequency_hz, self.spec.resolution_bits)?;
        self.initialized = true;
        info!(
            "servo: GPIO{} at {} Hz, {}-bit ({}–{} µs)",
            self.pin,
            self.spec.frequency_hz,
            self.spec.resolution_bits,
            self.spec.min_pulse_us,
            self.spec.max_pulse_us
        );
        Ok(())
    }

    /// Drive the servo to the end stop for `engaged` and return the duty
    /// written, or `None` if the channel is not configured.
    ///
    /// Every call writes and commits, even when the duty is unchanged.
    pub fn set_position(&mut self, engaged: bool) -> Option<u32> {
        if !self.initialized {
            warn!("servo: channel not configured, ignoring position {}", engaged);
            return None;
        }
        let duty = self.spec.duty_for(engaged);
        self.pwm.set_duty(duty);
        self.pwm.commit();
        self.last_duty = Some(duty);
        debug!("servo: {}° -> duty {}", angle_for(engaged), duty);
        Some(duty)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Duty committed by the most recent [`set_position`](Self::set_position).
    pub fn last_duty(&self) -> Option<u32> {
        self.last_duty
    }

    pub fn spec(&self) -> &PulseSpec {
        &self.spec
    }

    /// The owned PWM channel.
    pub fn pwm(&self) -> &P {
        &self.pwm
    }
}

//! GPIO / peripheral pin assignments for both node boards.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  The awning and rain-sensor boards are separate
//! deployments, so they may reuse the same GPIO number.

// ---------------------------------------------------------------------------
// Awning node: positional servo
// ---------------------------------------------------------------------------

/// LEDC PWM output to the servo signal line.
pub const SERVO_PWM_GPIO: i32 = 4;

/// LEDC timer dedicated to the servo (low-speed mode).
pub const SERVO_LEDC_TIMER: u32 = 0;
/// LEDC channel dedicated to the servo (low-speed mode).
pub const SERVO_LEDC_CHANNEL: u32 = 0;

// ---------------------------------------------------------------------------
// Rain sensor node
// ---------------------------------------------------------------------------

/// Digital output of the rain sensor module.  Active-low:
/// HIGH = dry, LOW = water on the sensing plate.
/// Must be an RTC-capable pin so it can arm deep-sleep GPIO wake.
pub const RAIN_SENSOR_GPIO: i32 = 4;

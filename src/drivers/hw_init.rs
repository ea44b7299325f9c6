//! One-shot hardware peripheral initialization and register helpers.
//!
//! Configures the servo's LEDC timer/channel and the rain sensor's GPIO
//! input using raw ESP-IDF sys calls.  Called once per boot by the
//! adapters, before the service starts.
//!
//! On the host every helper is backed by atomics so the adapters can be
//! exercised in tests.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::warn;
use log::info;

use crate::error::HwInitError;
#[cfg(target_os = "espidf")]
use crate::pins;

// ── Host simulation state ─────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
static SIM_LEDC_CONFIGURED: AtomicBool = AtomicBool::new(false);
#[cfg(not(target_os = "espidf"))]
static SIM_STAGED_DUTY: AtomicU32 = AtomicU32::new(0);
#[cfg(not(target_os = "espidf"))]
static SIM_COMMITTED_DUTY: AtomicU32 = AtomicU32::new(0);
/// Idle level of a pulled-up, dry sensor line.
#[cfg(not(target_os = "espidf"))]
static SIM_GPIO_LEVEL: AtomicBool = AtomicBool::new(true);

/// Duty count most recently latched by [`ledc_commit`].
#[cfg(not(target_os = "espidf"))]
pub fn sim_committed_duty() -> u32 {
    SIM_COMMITTED_DUTY.load(Ordering::Relaxed)
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_ledc_configured() -> bool {
    SIM_LEDC_CONFIGURED.load(Ordering::Relaxed)
}

/// Drive the simulated sensor line.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_gpio_level(high: bool) {
    SIM_GPIO_LEVEL.store(high, Ordering::Relaxed);
}

// ── LEDC PWM (servo) ──────────────────────────────────────────

/// Configure the servo timer and bind the channel to `gpio`, duty 0.
#[cfg(target_os = "espidf")]
pub fn init_servo_ledc(gpio: i32, frequency_hz: u32, resolution_bits: u32) -> Result<(), HwInitError> {
    let timer = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: pins::SERVO_LEDC_TIMER,
        duty_resolution: resolution_bits,
        freq_hz: frequency_hz,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    // SAFETY: Called once from the single main task before any duty write.
    let ret = unsafe { ledc_timer_config(&timer) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::LedcTimerFailed(ret));
    }

    let channel = ledc_channel_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        channel: pins::SERVO_LEDC_CHANNEL,
        timer_sel: pins::SERVO_LEDC_TIMER,
        gpio_num: gpio,
        duty: 0,
        hpoint: 0,
        ..Default::default()
    };
    // SAFETY: Timer above is configured; same single-task context.
    let ret = unsafe { ledc_channel_config(&channel) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::LedcChannelFailed(ret));
    }

    info!(
        "hw_init: LEDC servo on GPIO{} (timer={}, ch={}, {} Hz, {}-bit)",
        gpio, pins::SERVO_LEDC_TIMER, pins::SERVO_LEDC_CHANNEL, frequency_hz, resolution_bits
    );
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_servo_ledc(gpio: i32, frequency_hz: u32, resolution_bits: u32) -> Result<(), HwInitError> {
    SIM_LEDC_CONFIGURED.store(true, Ordering::Relaxed);
    info!(
        "hw_init(sim): LEDC servo on GPIO{} ({} Hz, {}-bit)",
        gpio, frequency_hz, resolution_bits
    );
    Ok(())
}

/// Stage a duty count on `channel`.  Takes effect on [`ledc_commit`].
#[cfg(target_os = "espidf")]
pub fn ledc_stage(channel: u32, duty: u32) {
    // SAFETY: Channel configured in init_servo_ledc(); main task only.
    let ret = unsafe { ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty) };
    if ret != ESP_OK as i32 {
        warn!("ledc_set_duty(ch={}, {}) failed (rc={})", channel, duty, ret);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_stage(_channel: u32, duty: u32) {
    SIM_STAGED_DUTY.store(duty, Ordering::Relaxed);
}

/// Latch the staged duty into the output.
#[cfg(target_os = "espidf")]
pub fn ledc_commit(channel: u32) {
    // SAFETY: Same contract as ledc_stage().
    let ret = unsafe { ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel) };
    if ret != ESP_OK as i32 {
        warn!("ledc_update_duty(ch={}) failed (rc={})", channel, ret);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_commit(_channel: u32) {
    SIM_COMMITTED_DUTY.store(SIM_STAGED_DUTY.load(Ordering::Relaxed), Ordering::Relaxed);
}

// ── GPIO input (rain sensor) ──────────────────────────────────

/// Configure `gpio` as a plain input.  The sensor module drives the line
/// itself, so no internal pulls are enabled.
#[cfg(target_os = "espidf")]
pub fn init_sensor_input(gpio: i32) -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << gpio,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    // SAFETY: Called once from the single main task at boot.
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    info!("hw_init: GPIO{} configured as sensor input", gpio);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_sensor_input(gpio: i32) -> Result<(), HwInitError> {
    info!("hw_init(sim): GPIO{} configured as sensor input", gpio);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin; safe to call from main context.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    SIM_GPIO_LEVEL.load(Ordering::Relaxed)
}

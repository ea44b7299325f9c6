//! Deep-sleep wake arming and entry.
//!
//! Thin wrappers over the ESP-IDF sleep API.  Arming calls log a warning on
//! a non-OK return code and carry on; the node must still reach sleep.
//!
//! On the host the armed sources are recorded in atomics and
//! [`deep_sleep_start`] ends the process.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, AtomicU64, Ordering};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;
#[cfg(target_os = "espidf")]
use log::warn;

use crate::app::ports::WakeCause;
use crate::fsm::{WakeKind, WakeLevel};

// ── Host simulation state ─────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
static SIM_TIMER_ARMED: AtomicBool = AtomicBool::new(false);
#[cfg(not(target_os = "espidf"))]
static SIM_TIMER_US: AtomicU64 = AtomicU64::new(0);
#[cfg(not(target_os = "espidf"))]
static SIM_GPIO_ARMED: AtomicBool = AtomicBool::new(false);
#[cfg(not(target_os = "espidf"))]
static SIM_GPIO_PIN: AtomicI32 = AtomicI32::new(-1);
/// 0 = power-on, 1 = timer, 2 = GPIO.
#[cfg(not(target_os = "espidf"))]
static SIM_WAKE_CAUSE: AtomicU32 = AtomicU32::new(0);

/// Armed timer duration, if a timer wake is armed.
#[cfg(not(target_os = "espidf"))]
pub fn sim_armed_timer_us() -> Option<u64> {
    SIM_TIMER_ARMED
        .load(Ordering::Relaxed)
        .then(|| SIM_TIMER_US.load(Ordering::Relaxed))
}

/// Armed GPIO wake pin, if a GPIO wake is armed.
#[cfg(not(target_os = "espidf"))]
pub fn sim_armed_gpio_pin() -> Option<i32> {
    SIM_GPIO_ARMED
        .load(Ordering::Relaxed)
        .then(|| SIM_GPIO_PIN.load(Ordering::Relaxed))
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_wake_cause(cause: WakeCause) {
    let raw = match cause {
        WakeCause::PowerOn => 0,
        WakeCause::Timer => 1,
        WakeCause::Gpio => 2,
        WakeCause::Other(code) => code,
    };
    SIM_WAKE_CAUSE.store(raw, Ordering::Relaxed);
}

// ── Wake sources ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn disable_wake_source(kind: WakeKind) {
    let source = match kind {
        WakeKind::Timer => esp_sleep_source_t_ESP_SLEEP_WAKEUP_TIMER,
        WakeKind::Gpio => esp_sleep_source_t_ESP_SLEEP_WAKEUP_GPIO,
    };
    // SAFETY: Plain register/config write; main task only.
    let ret = unsafe { esp_sleep_disable_wakeup_source(source) };
    // ESP_ERR_INVALID_STATE just means the source was not armed.
    if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
        warn!("sleep: disable {:?} wake failed (rc={})", kind, ret);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn disable_wake_source(kind: WakeKind) {
    match kind {
        WakeKind::Timer => SIM_TIMER_ARMED.store(false, Ordering::Relaxed),
        WakeKind::Gpio => SIM_GPIO_ARMED.store(false, Ordering::Relaxed),
    }
}

#[cfg(target_os = "espidf")]
pub fn enable_timer_wake(duration_us: u64) {
    // SAFETY: Main task only, before deep sleep entry.
    let ret = unsafe { esp_sleep_enable_timer_wakeup(duration_us) };
    if ret != ESP_OK as i32 {
        warn!("sleep: timer wake ({} us) failed (rc={})", duration_us, ret);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn enable_timer_wake(duration_us: u64) {
    SIM_TIMER_US.store(duration_us, Ordering::Relaxed);
    SIM_TIMER_ARMED.store(true, Ordering::Relaxed);
}

/// Arm a deep-sleep wake when `pin` sits at `level`.  `pin` must be an
/// RTC-capable GPIO.
#[cfg(target_os = "espidf")]
pub fn enable_gpio_wake(pin: i32, level: WakeLevel) {
    let mode = match level {
        WakeLevel::Low => esp_deepsleep_gpio_wake_up_mode_t_ESP_GPIO_WAKEUP_GPIO_LOW,
        WakeLevel::High => esp_deepsleep_gpio_wake_up_mode_t_ESP_GPIO_WAKEUP_GPIO_HIGH,
    };
    // SAFETY: Main task only, before deep sleep entry.
    let ret = unsafe { esp_deep_sleep_enable_gpio_wakeup(1u64 << pin, mode) };
    if ret != ESP_OK as i32 {
        warn!("sleep: GPIO{} wake failed (rc={})", pin, ret);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn enable_gpio_wake(pin: i32, _level: WakeLevel) {
    SIM_GPIO_PIN.store(pin, Ordering::Relaxed);
    SIM_GPIO_ARMED.store(true, Ordering::Relaxed);
}

// ── Entry and wake cause ──────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn deep_sleep_start() -> ! {
    // SAFETY: Does not return; the chip restarts from reset on wake.
    unsafe { esp_deep_sleep_start() };
    #[allow(unreachable_code)]
    loop {}
}

#[cfg(not(target_os = "espidf"))]
pub fn deep_sleep_start() -> ! {
    log::info!("sleep(sim): deep sleep, exiting");
    std::process::exit(0)
}

#[cfg(target_os = "espidf")]
pub fn wake_cause() -> WakeCause {
    // SAFETY: Read-only query.
    let cause = unsafe { esp_sleep_get_wakeup_cause() };
    #[allow(non_upper_case_globals)]
    match cause {
        esp_sleep_source_t_ESP_SLEEP_WAKEUP_UNDEFINED => WakeCause::PowerOn,
        esp_sleep_source_t_ESP_SLEEP_WAKEUP_TIMER => WakeCause::Timer,
        esp_sleep_source_t_ESP_SLEEP_WAKEUP_GPIO => WakeCause::Gpio,
        other => WakeCause::Other(other),
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn wake_cause() -> WakeCause {
    match SIM_WAKE_CAUSE.load(Ordering::Relaxed) {
        0 => WakeCause::PowerOn,
        1 => WakeCause::Timer,
        2 => WakeCause::Gpio,
        other => WakeCause::Other(other),
    }
}

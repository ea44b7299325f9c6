//! Mock hardware adapters for integration tests.
//!
//! Record every port call so tests can assert on the full call history
//! without touching real GPIO/PWM/sleep registers.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin};

use rainshade::app::events::AppEvent;
use rainshade::app::params::ParamValue;
use rainshade::app::ports::{
    ConfigError, ConfigPort, EventSink, PwmPort, RetainedFlagPort, SleepPort, StateSink, WakeCause,
};
use rainshade::config::NodeConfig;
use rainshade::error::HwInitError;
use rainshade::fsm::{WakeKind, WakeLevel};

// ── PWM ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmCall {
    Configure { pin: i32, frequency_hz: u32, resolution_bits: u32 },
    SetDuty(u32),
    Commit,
}

#[derive(Default)]
pub struct MockPwm {
    pub calls: Vec<PwmCall>,
    pub fail_with: Option<HwInitError>,
}

#[allow(dead_code)]
impl MockPwm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(e: HwInitError) -> Self {
        Self {
            calls: Vec::new(),
            fail_with: Some(e),
        }
    }

    /// Duties written, in order.
    pub fn duties(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                PwmCall::SetDuty(d) => Some(*d),
                _ => None,
            })
            .collect()
    }
}

impl PwmPort for MockPwm {
    fn configure_channel(
        &mut self,
        pin: i32,
        frequency_hz: u32,
        resolution_bits: u32,
    ) -> Result<(), HwInitError> {
        if let Some(e) = self.fail_with {
            return Err(e);
        }
        self.calls.push(PwmCall::Configure {
            pin,
            frequency_hz,
            resolution_bits,
        });
        Ok(())
    }

    fn set_duty(&mut self, duty: u32) {
        self.calls.push(PwmCall::SetDuty(duty));
    }

    fn commit(&mut self) {
        self.calls.push(PwmCall::Commit);
    }
}

// ── Sleep ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepCall {
    Disable(WakeKind),
    Timer(u64),
    Edge { pin: i32, level: WakeLevel },
}

pub struct MockSleep {
    pub calls: Vec<SleepCall>,
    pub cause: WakeCause,
}

#[allow(dead_code)]
impl MockSleep {
    pub fn new(cause: WakeCause) -> Self {
        Self {
            calls: Vec::new(),
            cause,
        }
    }

    /// Wake sources left armed after replaying the call history.
    pub fn armed(&self) -> Vec<SleepCall> {
        let mut armed: Vec<SleepCall> = Vec::new();
        for call in &self.calls {
            match call {
                SleepCall::Disable(WakeKind::Timer) => {
                    armed.retain(|c| !matches!(c, SleepCall::Timer(_)));
                }
                SleepCall::Disable(WakeKind::Gpio) => {
                    armed.retain(|c| !matches!(c, SleepCall::Edge { .. }));
                }
                other => armed.push(*other),
            }
        }
        armed
    }
}

impl SleepPort for MockSleep {
    fn disable_wake_source(&mut self, kind: WakeKind) {
        self.calls.push(SleepCall::Disable(kind));
    }

    fn enable_timer_wake(&mut self, duration_us: u64) {
        self.calls.push(SleepCall::Timer(duration_us));
    }

    fn enable_edge_wake(&mut self, pin: i32, level: WakeLevel) {
        self.calls.push(SleepCall::Edge { pin, level });
    }

    fn enter_deep_sleep(&mut self) -> ! {
        panic!("deep sleep entered");
    }

    fn wake_cause(&self) -> WakeCause {
        self.cause
    }
}

// ── Retained flag ─────────────────────────────────────────────

#[derive(Default)]
pub struct MockRetained {
    pub value: bool,
    pub loads: std::cell::Cell<u32>,
    pub stores: Vec<bool>,
}

#[allow(dead_code)]
impl MockRetained {
    pub fn holding(value: bool) -> Self {
        Self {
            value,
            ..Default::default()
        }
    }
}

impl RetainedFlagPort for MockRetained {
    fn load(&self) -> bool {
        self.loads.set(self.loads.get() + 1);
        self.value
    }

    fn store(&mut self, value: bool) {
        self.stores.push(value);
        self.value = value;
    }
}

// ── Sensor pin ────────────────────────────────────────────────

/// Input pin fixed at one level.
pub struct MockPin {
    pub high: bool,
    pub reads: u32,
}

impl MockPin {
    pub fn high() -> Self {
        Self { high: true, reads: 0 }
    }

    pub fn low() -> Self {
        Self { high: false, reads: 0 }
    }
}

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl InputPin for MockPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        self.reads += 1;
        Ok(self.high)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        self.reads += 1;
        Ok(!self.high)
    }
}

// ── Delay ─────────────────────────────────────────────────────

/// Records requested delays instead of sleeping.
#[derive(Default)]
pub struct NoDelay {
    pub total_ns: u64,
}

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

// ── State sink ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Update(String, ParamValue),
    Notify(String, ParamValue),
}

#[derive(Default)]
pub struct RecordingStateSink {
    pub calls: Vec<SinkCall>,
}

impl StateSink for RecordingStateSink {
    fn update(&mut self, param: &str, value: &ParamValue) {
        self.calls.push(SinkCall::Update(param.to_string(), value.clone()));
    }

    fn update_and_notify(&mut self, param: &str, value: &ParamValue) {
        self.calls.push(SinkCall::Notify(param.to_string(), value.clone()));
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct LogSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Config store ──────────────────────────────────────────────

/// In-memory config store.  Validates on save like the NVS adapter.
#[derive(Default)]
pub struct MockConfigStore {
    pub saved: Vec<NodeConfig>,
    pub fail_with: Option<ConfigError>,
}

impl ConfigPort for MockConfigStore {
    fn load(&self) -> Result<NodeConfig, ConfigError> {
        Ok(self.saved.last().cloned().unwrap_or_default())
    }

    fn save(&mut self, config: &NodeConfig) -> Result<(), ConfigError> {
        if let Some(e) = self.fail_with {
            return Err(e);
        }
        config.validate()?;
        self.saved.push(config.clone());
        Ok(())
    }
}

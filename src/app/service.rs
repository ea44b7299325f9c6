//! Application services: the hexagonal core.
//!
//! One service per node type.  Each owns its hardware ports exclusively and
//! exposes a hardware-agnostic API; sinks are injected at call sites, so
//! both services run unchanged against the mock adapters in the tests.
//!
//! ```text
//!                 ┌────────────────────┐
//!  AppCommand ──▶ │   AwningService    │ ──▶ PwmPort
//!                 │ ServoPositionMapper│ ──▶ StateSink · EventSink
//!                 └────────────────────┘
//!
//!   InputPin  ──▶ ┌────────────────────┐ ──▶ SleepPort
//!   Retained  ◀─▶ │ RainSensorService  │ ──▶ StateSink · EventSink
//!   DelayNs   ◀── │   cycle FSM        │
//!                 └────────────────────┘
//! ```

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use log::{info, warn};

use crate::config::{AwningConfig, NodeConfig, SensorConfig};
use crate::control::servo::ServoPositionMapper;
use crate::error::Result;
use crate::fsm::context::CycleContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{CycleState, Fsm, Reading, ReportKind, WakeKind, WakeSource};

use super::commands::{AppCommand, WriteSource};
use super::events::AppEvent;
use super::params::{
    ParamName, ParamValue, AWNING_DEVICE, POWER_PARAM, RAIN_SENSOR_DEVICE, WATER_ALARM_PARAM,
};
use super::ports::{
    ConfigPort, EventSink, PwmPort, RetainedFlagPort, SleepPort, StateSink, WakeCause,
};

// ───────────────────────────────────────────────────────────────
// AwningService
// ───────────────────────────────────────────────────────────────

/// Drives the awning servo from remote power writes.
pub struct AwningService<P: PwmPort> {
    servo: ServoPositionMapper<P>,
    default_engaged: bool,
    /// Last position successfully committed.
    engaged: Option<bool>,
    /// A console `save` is waiting for [`save_if_pending`](Self::save_if_pending).
    save_pending: bool,
}

impl<P: PwmPort> AwningService<P> {
    /// Rejects pulse timing that fails [`PulseSpec::validate`](crate::control::servo::PulseSpec::validate).
    pub fn new(pwm: P, config: &AwningConfig, pin: i32) -> Result<Self> {
        config.pulse.validate()?;
        Ok(Self {
            servo: ServoPositionMapper::new(pwm, config.pulse, pin),
            default_engaged: config.default_engaged,
            engaged: None,
            save_pending: false,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Configure the PWM channel and move to the default position.
    ///
    /// A channel setup failure is returned as [`Error::Init`](crate::error::Error::Init);
    /// the caller treats it as fatal.
    pub fn start(&mut self, events: &mut impl EventSink) -> Result<()> {
        self.servo.initialize()?;
        events.emit(&AppEvent::Started {
            node: AWNING_DEVICE.node_name,
        });
        info!(
            "Awning starting, default position: {}",
            if self.default_engaged { "engaged" } else { "disengaged" }
        );
        self.apply(self.default_engaged, events);
        Ok(())
    }

    // ── Command handling ──────────────────────────────────────

    /// Process a remote parameter write.
    ///
    /// A boolean write to the power parameter moves the servo and is echoed
    /// back on the silent path.  `SaveDefault` only marks a save pending.
    /// Anything else is acknowledged and ignored.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        state: &mut impl StateSink,
        events: &mut impl EventSink,
    ) {
        match cmd {
            AppCommand::WriteParam {
                name,
                value,
                source,
            } => self.write_param(&name, &value, source, state, events),
            AppCommand::SaveDefault => {
                info!("Save requested: boot position will follow the current one");
                self.save_pending = true;
            }
        }
    }

    /// Shorthand for a cloud-originated write.
    pub fn on_command(
        &mut self,
        name: &str,
        value: &ParamValue,
        state: &mut impl StateSink,
        events: &mut impl EventSink,
    ) {
        self.write_param(name, value, WriteSource::Cloud, state, events);
    }

    // ── Config persistence ────────────────────────────────────

    /// Persist the current position as the boot default if a save was
    /// requested.  Returns `true` if the config was written.
    ///
    /// `config` is updated only when the write succeeds.  A failed save is
    /// logged and dropped, not retried.
    pub fn save_if_pending(&mut self, config: &mut NodeConfig, storage: &mut impl ConfigPort) -> bool {
        if !self.save_pending {
            return false;
        }
        self.save_pending = false;

        let engaged = self.engaged.unwrap_or(self.default_engaged);
        let mut next = config.clone();
        next.awning.default_engaged = engaged;
        match storage.save(&next) {
            Ok(()) => {
                *config = next;
                self.default_engaged = engaged;
                info!(
                    "Config saved, boot position: {}",
                    if engaged { "engaged" } else { "disengaged" }
                );
                true
            }
            Err(e) => {
                warn!("Config save failed: {}", e);
                false
            }
        }
    }

    /// Whether a save is waiting.
    pub fn is_save_pending(&self) -> bool {
        self.save_pending
    }

    // ── Queries ───────────────────────────────────────────────

    /// Position most recently committed to the servo, if any.
    pub fn engaged(&self) -> Option<bool> {
        self.engaged
    }

    pub fn servo(&self) -> &ServoPositionMapper<P> {
        &self.servo
    }

    // ── Internal ──────────────────────────────────────────────

    fn write_param(
        &mut self,
        name: &str,
        value: &ParamValue,
        source: WriteSource,
        state: &mut impl StateSink,
        events: &mut impl EventSink,
    ) {
        info!("Received write request via: {}", source.as_str());

        let engaged = match (name, value.as_bool()) {
            (POWER_PARAM, Some(engaged)) => engaged,
            (POWER_PARAM, None) => {
                warn!("Ignoring non-boolean {} value {}", POWER_PARAM, value);
                self.ignored(name, events);
                return;
            }
            _ => {
                info!("Ignoring write to unhandled param {}", name);
                self.ignored(name, events);
                return;
            }
        };

        info!("Received value = {} for {} - {}", engaged, AWNING_DEVICE.device_name, name);
        if self.apply(engaged, events) {
            state.update(POWER_PARAM, &ParamValue::Bool(engaged));
        }
    }

    fn apply(&mut self, engaged: bool, events: &mut impl EventSink) -> bool {
        let Some(duty) = self.servo.set_position(engaged) else {
            return false;
        };
        self.engaged = Some(engaged);
        events.emit(&AppEvent::PositionCommitted { engaged, duty });
        true
    }

    fn ignored(&self, name: &str, events: &mut impl EventSink) {
        // Over-long names are reported as empty.
        let param = ParamName::try_from(name).unwrap_or_default();
        events.emit(&AppEvent::CommandIgnored { param });
    }
}

// ───────────────────────────────────────────────────────────────
// RainSensorService
// ───────────────────────────────────────────────────────────────

/// Upper bound on FSM steps in one cycle.  A healthy cycle needs three.
const MAX_CYCLE_STEPS: u32 = 16;

/// Everything one wake cycle decided, short of entering sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleOutcome {
    pub wake_cause: WakeCause,
    /// Retained reading this cycle started from.
    pub previous: bool,
    /// Reading classified and reported this cycle.
    pub reading: Option<Reading>,
    /// Wake source armed for the coming sleep.
    pub wake: Option<WakeSource>,
    /// State the FSM stopped in; `Suspended` for a complete cycle.
    pub final_state: CycleState,
}

impl CycleOutcome {
    pub fn is_complete(&self) -> bool {
        self.final_state == CycleState::Suspended && self.reading.is_some() && self.wake.is_some()
    }
}

/// Runs one sample → report → arm → sleep cycle per boot.
pub struct RainSensorService<I, S, R, D>
where
    I: InputPin<Error = Infallible>,
    S: SleepPort,
    R: RetainedFlagPort,
    D: DelayNs,
{
    pin: I,
    sleep: S,
    retained: R,
    delay: D,
    sensor_pin: i32,
    config: SensorConfig,
}

impl<I, S, R, D> RainSensorService<I, S, R, D>
where
    I: InputPin<Error = Infallible>,
    S: SleepPort,
    R: RetainedFlagPort,
    D: DelayNs,
{
    pub fn new(pin: I, sleep: S, retained: R, delay: D, sensor_pin: i32, config: SensorConfig) -> Self {
        Self {
            pin,
            sleep,
            retained,
            delay,
            sensor_pin,
            config,
        }
    }

    /// Run the whole cycle and power down.  Execution resumes from reset.
    pub fn run_cycle(
        &mut self,
        state: &mut impl StateSink,
        events: &mut impl EventSink,
    ) -> ! {
        let outcome = self.sample_and_arm(state, events);
        if !outcome.is_complete() {
            warn!("Cycle stopped early in {:?}, sleeping anyway", outcome.final_state);
        }
        info!("Entering deep sleep");
        self.sleep.enter_deep_sleep()
    }

    /// Every step of the cycle except sleep entry.
    ///
    /// The retained flag is read once at the start and written once during
    /// reporting.  Both wake source kinds are disabled before exactly one is
    /// armed.
    pub fn sample_and_arm(
        &mut self,
        state: &mut impl StateSink,
        events: &mut impl EventSink,
    ) -> CycleOutcome {
        let wake_cause = self.sleep.wake_cause();
        let previous = self.retained.load();
        events.emit(&AppEvent::Started {
            node: RAIN_SENSOR_DEVICE.node_name,
        });
        events.emit(&AppEvent::Woke {
            cause: wake_cause,
            previous,
        });
        info!(
            "Previous rain state: {}",
            if previous { "Raining" } else { "Not Raining" }
        );

        let mut fsm = Fsm::new(build_state_table(), CycleState::Sampling);
        let mut ctx = CycleContext::new(previous, self.sensor_pin, &self.config);
        fsm.start(&mut ctx);

        while !fsm.is_terminal() && fsm.steps() < MAX_CYCLE_STEPS {
            self.perform_io(fsm.current_state(), &mut ctx, state, events);
            if let Some((from, to)) = fsm.step(&mut ctx) {
                events.emit(&AppEvent::StateChanged { from, to });
            }
        }

        CycleOutcome {
            wake_cause,
            previous,
            reading: ctx.reading,
            wake: ctx.wake,
            final_state: fsm.current_state(),
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn sleep(&self) -> &S {
        &self.sleep
    }

    pub fn retained(&self) -> &R {
        &self.retained
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    // ── Internal ──────────────────────────────────────────────

    /// Hardware side of `current`.  Each action runs at most once per cycle.
    fn perform_io(
        &mut self,
        current: CycleState,
        ctx: &mut CycleContext,
        state: &mut impl StateSink,
        events: &mut impl EventSink,
    ) {
        match current {
            CycleState::Sampling if ctx.raw_high.is_none() => {
                ctx.raw_high = Some(self.read_level());
            }
            CycleState::Reporting if !ctx.reported => {
                if let Some(reading) = ctx.reading {
                    self.report(reading, state, events);
                    ctx.reported = true;
                }
            }
            CycleState::ArmingTimerWake | CycleState::ArmingEdgeWake if !ctx.wake_armed => {
                if let Some(wake) = ctx.wake {
                    self.arm(wake);
                    events.emit(&AppEvent::WakeArmed(wake));
                    ctx.wake_armed = true;
                }
            }
            _ => {}
        }
    }

    fn read_level(&mut self) -> bool {
        match self.pin.is_high() {
            Ok(high) => high,
            Err(e) => match e {},
        }
    }

    /// Send the reading, persist it, then give the radio time to flush.
    fn report(&mut self, reading: Reading, state: &mut impl StateSink, events: &mut impl EventSink) {
        let value = ParamValue::Bool(reading.raining);
        match reading.report {
            ReportKind::Notify => state.update_and_notify(WATER_ALARM_PARAM, &value),
            ReportKind::Update => state.update(WATER_ALARM_PARAM, &value),
        }
        events.emit(&AppEvent::RainReported {
            raining: reading.raining,
            kind: reading.report,
        });

        self.retained.store(reading.raining);
        self.delay.delay_ms(self.config.settle_delay_ms);
    }

    fn arm(&mut self, wake: WakeSource) {
        self.sleep.disable_wake_source(WakeKind::Timer);
        self.sleep.disable_wake_source(WakeKind::Gpio);
        match wake {
            WakeSource::Timer { duration_us } => self.sleep.enable_timer_wake(duration_us),
            WakeSource::EdgeLevel { pin, level } => self.sleep.enable_edge_wake(pin, level),
        }
    }
}

//! Integration tests for one RainSensorService wake cycle against mocks.
//!
//! Each test is one boot: a fresh service with the retained flag and wake
//! cause the previous sleep would have left behind.

use crate::mock_hw::{
    LogSink, MockPin, MockRetained, MockSleep, NoDelay, RecordingStateSink, SinkCall, SleepCall,
};

use rainshade::app::events::AppEvent;
use rainshade::app::params::ParamValue;
use rainshade::app::ports::WakeCause;
use rainshade::app::service::{CycleOutcome, RainSensorService};
use rainshade::config::SensorConfig;
use rainshade::fsm::{CycleState, Reading, ReportKind, WakeKind, WakeLevel, WakeSource};

const SENSOR_PIN: i32 = 4;

type Sensor = RainSensorService<MockPin, MockSleep, MockRetained, NoDelay>;

fn boot(pin: MockPin, previous: bool, cause: WakeCause) -> Sensor {
    RainSensorService::new(
        pin,
        MockSleep::new(cause),
        MockRetained::holding(previous),
        NoDelay::default(),
        SENSOR_PIN,
        SensorConfig::default(),
    )
}

fn run(sensor: &mut Sensor) -> (CycleOutcome, RecordingStateSink, LogSink) {
    let mut state = RecordingStateSink::default();
    let mut events = LogSink::default();
    let outcome = sensor.sample_and_arm(&mut state, &mut events);
    (outcome, state, events)
}

fn water_alarm(raining: bool) -> ParamValue {
    ParamValue::Bool(raining)
}

// ── Scenario: rain onset ──────────────────────────────────────

#[test]
fn rain_onset_notifies_and_arms_timer() {
    let mut sensor = boot(MockPin::low(), false, WakeCause::Gpio);
    let (outcome, state, _) = run(&mut sensor);

    assert_eq!(
        state.calls,
        vec![SinkCall::Notify("water-alarm".into(), water_alarm(true))]
    );
    assert!(sensor.retained().value);
    assert_eq!(
        sensor.sleep().armed(),
        vec![SleepCall::Timer(10_000_000)]
    );
    assert_eq!(outcome.wake, Some(WakeSource::Timer { duration_us: 10_000_000 }));
    assert!(outcome.is_complete());
}

// ── Scenario: still raining ───────────────────────────────────

#[test]
fn continued_rain_updates_silently_and_rearms_timer() {
    let mut sensor = boot(MockPin::low(), true, WakeCause::Timer);
    let (outcome, state, _) = run(&mut sensor);

    assert_eq!(
        state.calls,
        vec![SinkCall::Update("water-alarm".into(), water_alarm(true))]
    );
    assert!(sensor.retained().value);
    assert_eq!(sensor.sleep().armed(), vec![SleepCall::Timer(10_000_000)]);
    assert_eq!(
        outcome.reading,
        Some(Reading { raining: true, report: ReportKind::Update })
    );
}

// ── Scenario: rain stops ──────────────────────────────────────

#[test]
fn rain_stop_notifies_and_arms_gpio_low_wake() {
    let mut sensor = boot(MockPin::high(), true, WakeCause::Timer);
    let (outcome, state, _) = run(&mut sensor);

    assert_eq!(
        state.calls,
        vec![SinkCall::Notify("water-alarm".into(), water_alarm(false))]
    );
    assert!(!sensor.retained().value);
    assert_eq!(
        sensor.sleep().armed(),
        vec![SleepCall::Edge { pin: SENSOR_PIN, level: WakeLevel::Low }]
    );
    assert_eq!(
        outcome.wake,
        Some(WakeSource::EdgeLevel { pin: SENSOR_PIN, level: WakeLevel::Low })
    );
}

// ── Scenario: still dry ───────────────────────────────────────

#[test]
fn continued_dry_updates_silently_and_arms_gpio_wake() {
    let mut sensor = boot(MockPin::high(), false, WakeCause::Gpio);
    let (_, state, _) = run(&mut sensor);

    assert_eq!(
        state.calls,
        vec![SinkCall::Update("water-alarm".into(), water_alarm(false))]
    );
    assert!(!sensor.retained().value);
    assert_eq!(
        sensor.sleep().armed(),
        vec![SleepCall::Edge { pin: SENSOR_PIN, level: WakeLevel::Low }]
    );
}

// ── Cold boot ─────────────────────────────────────────────────

/// After a cold boot the retained flag reads `false`, so rain already
/// falling at power-on is reported as an edge.
#[test]
fn first_cycle_after_cold_boot_reports_rain_as_edge() {
    let mut sensor = boot(MockPin::low(), false, WakeCause::PowerOn);
    let (outcome, state, _) = run(&mut sensor);

    assert_eq!(outcome.wake_cause, WakeCause::PowerOn);
    assert!(!outcome.previous);
    assert!(matches!(state.calls.as_slice(), [SinkCall::Notify(..)]));
}

// ── Consecutive cycles ────────────────────────────────────────

/// The flag stored by one boot is the one the next boot starts from.
#[test]
fn two_raining_cycles_notify_then_update() {
    let mut first = boot(MockPin::low(), false, WakeCause::Gpio);
    let (_, first_state, _) = run(&mut first);
    assert_eq!(first.retained().stores, vec![true]);

    let mut second = boot(MockPin::low(), first.retained().value, WakeCause::Timer);
    let (outcome, second_state, _) = run(&mut second);

    assert_eq!(
        first_state.calls,
        vec![SinkCall::Notify("water-alarm".into(), water_alarm(true))]
    );
    assert_eq!(
        second_state.calls,
        vec![SinkCall::Update("water-alarm".into(), water_alarm(true))]
    );
    assert!(outcome.previous);
    assert_eq!(second.sleep().armed(), vec![SleepCall::Timer(10_000_000)]);
}

// ── Cycle invariants ──────────────────────────────────────────

#[test]
fn both_wake_kinds_are_disabled_before_arming() {
    for (pin, previous) in [(MockPin::low(), false), (MockPin::high(), true)] {
        let mut sensor = boot(pin, previous, WakeCause::Timer);
        run(&mut sensor);

        let calls = &sensor.sleep().calls;
        assert_eq!(calls.len(), 3, "two disables and one arm: {:?}", calls);
        assert!(calls[..2].contains(&SleepCall::Disable(WakeKind::Timer)));
        assert!(calls[..2].contains(&SleepCall::Disable(WakeKind::Gpio)));
        assert!(!matches!(calls[2], SleepCall::Disable(_)));
    }
}

#[test]
fn retained_flag_is_read_once_and_written_once() {
    let mut sensor = boot(MockPin::low(), false, WakeCause::Gpio);
    run(&mut sensor);

    assert_eq!(sensor.retained().loads.get(), 1);
    assert_eq!(sensor.retained().stores, vec![true]);
}

#[test]
fn settle_delay_elapses_before_sleep() {
    let mut sensor = boot(MockPin::high(), false, WakeCause::Gpio);
    let mut state = RecordingStateSink::default();
    let mut events = LogSink::default();
    sensor.sample_and_arm(&mut state, &mut events);

    let settle_ns = u64::from(sensor.config().settle_delay_ms) * 1_000_000;
    assert_eq!(sensor.delay().total_ns, settle_ns);
}

#[test]
fn cycle_walks_the_fsm_to_suspended() {
    let mut sensor = boot(MockPin::low(), false, WakeCause::Gpio);
    let (outcome, _, events) = run(&mut sensor);

    assert_eq!(outcome.final_state, CycleState::Suspended);
    let transitions: Vec<(CycleState, CycleState)> = events
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::StateChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        transitions,
        vec![
            (CycleState::Sampling, CycleState::Reporting),
            (CycleState::Reporting, CycleState::ArmingTimerWake),
            (CycleState::ArmingTimerWake, CycleState::Suspended),
        ]
    );
}

#[test]
fn report_precedes_wake_arming() {
    let mut sensor = boot(MockPin::high(), true, WakeCause::Timer);
    let (_, _, events) = run(&mut sensor);

    let reported = events
        .events
        .iter()
        .position(|e| matches!(e, AppEvent::RainReported { .. }));
    let armed = events
        .events
        .iter()
        .position(|e| matches!(e, AppEvent::WakeArmed(_)));
    assert!(reported.is_some() && armed.is_some());
    assert!(reported < armed);
}

#[test]
fn custom_recheck_interval_is_used_for_timer_wake() {
    let config = SensorConfig {
        rain_recheck_us: 60_000_000,
        ..SensorConfig::default()
    };
    let mut sensor = RainSensorService::new(
        MockPin::low(),
        MockSleep::new(WakeCause::Timer),
        MockRetained::holding(true),
        NoDelay::default(),
        SENSOR_PIN,
        config,
    );
    run(&mut sensor);
    assert_eq!(sensor.sleep().armed(), vec![SleepCall::Timer(60_000_000)]);
}

#[test]
#[should_panic(expected = "deep sleep")]
fn run_cycle_ends_in_deep_sleep() {
    let mut sensor = boot(MockPin::high(), false, WakeCause::Gpio);
    sensor.run_cycle(&mut RecordingStateSink::default(), &mut LogSink::default());
}

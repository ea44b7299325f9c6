//! Integration tests for the AwningService → servo mapper → PWM pipeline.

use crate::mock_hw::{
    LogSink, MockConfigStore, MockPwm, PwmCall, RecordingStateSink, SinkCall,
};

use rainshade::app::commands::{AppCommand, WriteSource};
use rainshade::app::events::AppEvent;
use rainshade::app::params::ParamValue;
use rainshade::app::service::AwningService;
use rainshade::app::ports::{ConfigError, ConfigPort};
use rainshade::config::{AwningConfig, NodeConfig};
use rainshade::control::servo::PulseSpec;
use rainshade::error::{Error, HwInitError};

fn started() -> (AwningService<MockPwm>, RecordingStateSink, LogSink) {
    let mut awning = AwningService::new(MockPwm::new(), &AwningConfig::default(), 4).unwrap();
    let mut events = LogSink::default();
    awning.start(&mut events).unwrap();
    (awning, RecordingStateSink::default(), events)
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_configures_channel_then_applies_default_position() {
    let (awning, _, events) = started();
    assert_eq!(
        awning.servo().spec().duty_for(false),
        204,
        "reference calibration"
    );
    assert_eq!(awning.engaged(), Some(false));
    assert!(events.events.contains(&AppEvent::PositionCommitted {
        engaged: false,
        duty: 204
    }));
}

#[test]
fn start_with_engaged_default() {
    let config = AwningConfig {
        default_engaged: true,
        ..Default::default()
    };
    let mut awning = AwningService::new(MockPwm::new(), &config, 4).unwrap();
    awning.start(&mut LogSink::default()).unwrap();
    assert_eq!(awning.engaged(), Some(true));
    assert_eq!(awning.servo().last_duty(), Some(1024));
}

#[test]
fn channel_failure_is_returned_and_nothing_is_written() {
    let mut awning = AwningService::new(
        MockPwm::failing(HwInitError::LedcChannelFailed(-1)),
        &AwningConfig::default(),
        4,
    )
    .unwrap();
    let mut events = LogSink::default();
    assert_eq!(
        awning.start(&mut events),
        Err(Error::Init(HwInitError::LedcChannelFailed(-1)))
    );
    assert!(!awning.servo().is_initialized());
    assert_eq!(awning.engaged(), None);
    assert!(events.events.is_empty());
}

#[test]
fn invalid_pulse_timing_is_rejected_before_touching_the_channel() {
    for pulse in [
        PulseSpec { frequency_hz: 0, ..PulseSpec::REFERENCE },
        PulseSpec { resolution_bits: 32, ..PulseSpec::REFERENCE },
    ] {
        let config = AwningConfig { pulse, ..Default::default() };
        assert!(matches!(
            AwningService::new(MockPwm::new(), &config, 4),
            Err(Error::Config(_))
        ));
    }
}

// ── Scenarios ─────────────────────────────────────────────────

#[test]
fn power_true_drives_servo_to_180_degrees() {
    let (mut awning, mut state, mut events) = started();

    awning.on_command("Power", &ParamValue::Bool(true), &mut state, &mut events);

    assert_eq!(awning.servo().last_duty(), Some(1024));
    assert_eq!(
        state.calls,
        vec![SinkCall::Update("Power".into(), ParamValue::Bool(true))],
        "accepted value is echoed on the silent path"
    );
}

#[test]
fn power_false_drives_servo_to_0_degrees() {
    let (mut awning, mut state, mut events) = started();

    awning.on_command("Power", &ParamValue::Bool(true), &mut state, &mut events);
    awning.on_command("Power", &ParamValue::Bool(false), &mut state, &mut events);

    assert_eq!(awning.servo().last_duty(), Some(204));
    assert_eq!(awning.engaged(), Some(false));
}

#[test]
fn repeated_command_writes_identical_duty_each_time() {
    let (mut awning, mut state, mut events) = started();

    awning.on_command("Power", &ParamValue::Bool(true), &mut state, &mut events);
    awning.on_command("Power", &ParamValue::Bool(true), &mut state, &mut events);

    let events_committed = events
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::PositionCommitted { engaged: true, duty: 1024 }))
        .count();
    assert_eq!(events_committed, 2);
    assert_eq!(state.calls.len(), 2);
}

#[test]
fn every_duty_write_is_followed_by_a_commit() {
    let mut awning = AwningService::new(MockPwm::new(), &AwningConfig::default(), 4).unwrap();
    let mut events = LogSink::default();
    let mut state = RecordingStateSink::default();
    awning.start(&mut events).unwrap();
    awning.on_command("Power", &ParamValue::Bool(true), &mut state, &mut events);
    awning.on_command("Power", &ParamValue::Bool(true), &mut state, &mut events);

    assert_eq!(
        awning.servo().pwm().calls,
        vec![
            PwmCall::Configure { pin: 4, frequency_hz: 50, resolution_bits: 13 },
            PwmCall::SetDuty(204),
            PwmCall::Commit,
            PwmCall::SetDuty(1024),
            PwmCall::Commit,
            PwmCall::SetDuty(1024),
            PwmCall::Commit,
        ]
    );
}

// ── Ignored writes ────────────────────────────────────────────

#[test]
fn non_boolean_power_is_ignored() {
    let (mut awning, mut state, mut events) = started();

    awning.on_command("Power", &ParamValue::Int(1), &mut state, &mut events);

    assert_eq!(awning.engaged(), Some(false), "position unchanged");
    assert!(state.calls.is_empty());
    assert!(matches!(
        events.events.last(),
        Some(AppEvent::CommandIgnored { param }) if param.as_str() == "Power"
    ));
}

#[test]
fn unknown_param_is_ignored() {
    let (mut awning, mut state, mut events) = started();

    let cmd = AppCommand::parse("Speed", "3", WriteSource::Cloud).unwrap();
    awning.handle_command(cmd, &mut state, &mut events);

    assert_eq!(awning.servo().last_duty(), Some(204));
    assert!(state.calls.is_empty());
}

#[test]
fn console_line_reaches_the_servo() {
    let (mut awning, mut state, mut events) = started();

    let cmd = AppCommand::parse_line("Power true").unwrap();
    awning.handle_command(cmd, &mut state, &mut events);

    assert_eq!(awning.engaged(), Some(true));
}

// ── Boot position persistence ─────────────────────────────────

#[test]
fn save_persists_current_position_as_boot_default() {
    let (mut awning, mut state, mut events) = started();
    let mut config = NodeConfig::default();
    let mut store = MockConfigStore::default();

    awning.on_command("Power", &ParamValue::Bool(true), &mut state, &mut events);
    assert!(!awning.save_if_pending(&mut config, &mut store), "no save requested yet");

    awning.handle_command(AppCommand::parse_line("save").unwrap(), &mut state, &mut events);
    assert!(awning.is_save_pending());
    assert!(awning.save_if_pending(&mut config, &mut store));

    assert!(!awning.is_save_pending());
    assert!(config.awning.default_engaged);
    assert_eq!(store.load().unwrap(), config);
    assert_eq!(store.saved.len(), 1);
}

#[test]
fn failed_save_leaves_config_untouched() {
    let (mut awning, mut state, mut events) = started();
    let mut config = NodeConfig::default();
    let mut store = MockConfigStore {
        fail_with: Some(ConfigError::StorageFull),
        ..Default::default()
    };

    awning.on_command("Power", &ParamValue::Bool(true), &mut state, &mut events);
    awning.handle_command(AppCommand::SaveDefault, &mut state, &mut events);

    assert!(!awning.save_if_pending(&mut config, &mut store));
    assert!(!config.awning.default_engaged);
    assert!(!awning.is_save_pending(), "failed saves are not retried");
    assert_eq!(awning.servo().last_duty(), Some(1024), "position unaffected");
}

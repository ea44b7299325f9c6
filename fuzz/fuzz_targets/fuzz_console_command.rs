//! Fuzz target: console command path
//!
//! Feeds arbitrary text through `AppCommand::parse_line` into a started
//! `AwningService` and verifies:
//! - No panics under arbitrary input
//! - Only the two calibrated duties ever reach the PWM channel
//!
//! cargo fuzz run fuzz_console_command

#![no_main]

use libfuzzer_sys::fuzz_target;
use rainshade::app::commands::AppCommand;
use rainshade::app::events::AppEvent;
use rainshade::app::params::ParamValue;
use rainshade::app::ports::{EventSink, PwmPort, StateSink};
use rainshade::app::service::AwningService;
use rainshade::config::AwningConfig;
use rainshade::error::HwInitError;

#[derive(Default)]
struct DutyLog(Vec<u32>);

impl PwmPort for DutyLog {
    fn configure_channel(&mut self, _pin: i32, _hz: u32, _bits: u32) -> Result<(), HwInitError> {
        Ok(())
    }

    fn set_duty(&mut self, duty: u32) {
        self.0.push(duty);
    }

    fn commit(&mut self) {}
}

struct Null;

impl StateSink for Null {
    fn update(&mut self, _param: &str, _value: &ParamValue) {}
    fn update_and_notify(&mut self, _param: &str, _value: &ParamValue) {}
}

impl EventSink for Null {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };

    let Ok(mut awning) = AwningService::new(DutyLog::default(), &AwningConfig::default(), 4) else {
        return;
    };
    if awning.start(&mut Null).is_err() {
        return;
    }

    for line in text.lines() {
        if let Ok(cmd) = AppCommand::parse_line(line) {
            awning.handle_command(cmd, &mut Null, &mut Null);
        }
    }

    let spec = awning.servo().spec();
    let allowed = [spec.duty_for(false), spec.duty_for(true)];
    for duty in &awning.servo().pwm().0 {
        assert!(allowed.contains(duty), "uncalibrated duty {duty}");
    }
});

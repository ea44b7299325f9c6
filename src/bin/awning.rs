//! Awning node: entry point.
//!
//! ```text
//!  console line ──▶ AppCommand ──▶ AwningService ──▶ LedcServoChannel
//!                                        │
//!                                        ├──▶ LogStateSink  (Power echo)
//!                                        └──▶ LogEventSink
//! ```
//!
//! Boots, configures the servo channel, moves to the configured default
//! position, then serves parameter writes typed on the serial console as
//! `<param> <json>` (e.g. `Power true`).  `save` stores the current position
//! as the boot default.
#![deny(unused_must_use)]

use std::io::BufRead;

use anyhow::Result;
use log::{error, info, warn};

use rainshade::adapters::hardware::LedcServoChannel;
use rainshade::adapters::log_sink::LogEventSink;
use rainshade::adapters::nvs::NvsAdapter;
use rainshade::adapters::state_sink::LogStateSink;
use rainshade::app::commands::AppCommand;
use rainshade::app::params::AWNING_DEVICE;
use rainshade::app::ports::ConfigPort;
use rainshade::app::service::AwningService;
use rainshade::config::{AwningConfig, NodeConfig};
use rainshade::error;
use rainshade::pins;

/// Poll interval while the console has no input.
const CONSOLE_IDLE_MS: u32 = 100;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("{} v{}", AWNING_DEVICE.node_name, env!("CARGO_PKG_VERSION"));

    // ── 2. Load config from NVS (or defaults) ─────────────────
    let mut nvs = match NvsAdapter::new() {
        Ok(n) => Some(n),
        Err(e) => {
            warn!("NVS init failed ({}), config will not persist", e);
            None
        }
    };
    let mut config = load_config(nvs.as_ref());

    // ── 3. Servo channel + default position ───────────────────
    let mut events = LogEventSink::new();
    let mut state = LogStateSink::new();
    let mut awning = match start_awning(&config.awning, &mut events) {
        Ok(a) => a,
        Err(e) => {
            error!("Servo init failed: {}, aborting", e);
            std::process::abort();
        }
    };

    // ── 4. Console command loop ───────────────────────────────
    info!("Console ready: <param> <json>, e.g. `Power true`, or `save`");
    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        line.clear();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => idle(),
            Ok(_) if line.trim().is_empty() => {}
            Ok(_) => match AppCommand::parse_line(&line) {
                Ok(cmd) => {
                    awning.handle_command(cmd, &mut state, &mut events);
                    if let Some(nvs) = nvs.as_mut() {
                        awning.save_if_pending(&mut config, nvs);
                    }
                }
                Err(e) => warn!("Console: {} in '{}'", e, line.trim()),
            },
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => idle(),
            Err(e) => {
                warn!("Console read failed: {}", e);
                idle();
            }
        }
    }
}

fn start_awning(
    config: &AwningConfig,
    events: &mut LogEventSink,
) -> error::Result<AwningService<LedcServoChannel>> {
    let mut awning = AwningService::new(LedcServoChannel::new(), config, pins::SERVO_PWM_GPIO)?;
    awning.start(events)?;
    Ok(awning)
}

fn load_config(nvs: Option<&NvsAdapter>) -> NodeConfig {
    let Some(nvs) = nvs else {
        return NodeConfig::default();
    };
    match nvs.load() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("NVS config load failed ({}), using defaults", e);
            NodeConfig::default()
        }
    }
}

fn idle() {
    esp_idf_hal::delay::FreeRtos::delay_ms(CONSOLE_IDLE_MS);
}

//! Rain sensor node: entry point.
//!
//! Every boot is one wake cycle: sample the sensor, report, arm exactly
//! one wake source, deep sleep.  The chip restarts from reset on wake and
//! runs this again.
//!
//! ```text
//!  boot ──▶ startup settle ──▶ RainSensorService::run_cycle() ──▶ deep sleep
//!   ▲                                                                │
//!   └──────────────── timer (raining) / GPIO low (dry) ──────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use embedded_hal::delay::DelayNs;
use log::{error, info, warn};

use rainshade::adapters::hardware::DeepSleepController;
use rainshade::adapters::log_sink::LogEventSink;
use rainshade::adapters::nvs::NvsAdapter;
use rainshade::adapters::retained::RtcRainFlag;
use rainshade::adapters::state_sink::LogStateSink;
use rainshade::adapters::time::TaskDelay;
use rainshade::app::params::RAIN_SENSOR_DEVICE;
use rainshade::app::ports::ConfigPort;
use rainshade::app::service::RainSensorService;
use rainshade::config::NodeConfig;
use rainshade::pins;
use rainshade::sensors::rain::RainSensorPin;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("{} v{}", RAIN_SENSOR_DEVICE.node_name, env!("CARGO_PKG_VERSION"));

    // ── 2. Sensor input ───────────────────────────────────────
    let pin = match RainSensorPin::new(pins::RAIN_SENSOR_GPIO) {
        Ok(p) => p,
        Err(e) => {
            error!("Sensor input init failed: {}, aborting", e);
            std::process::abort();
        }
    };

    // ── 3. Load config from NVS (or defaults) ─────────────────
    let config = match NvsAdapter::new().and_then(|nvs| nvs.load()) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Config unavailable ({}), using defaults", e);
            NodeConfig::default()
        }
    };

    // ── 4. Let the platform link come up ──────────────────────
    let mut delay = TaskDelay::new();
    delay.delay_ms(config.sensor.startup_settle_ms);

    // ── 5. One cycle, then sleep ──────────────────────────────
    let mut sensor = RainSensorService::new(
        pin,
        DeepSleepController::new(),
        RtcRainFlag::new(),
        delay,
        pins::RAIN_SENSOR_GPIO,
        config.sensor,
    );
    sensor.run_cycle(&mut LogStateSink::new(), &mut LogEventSink::new())
}

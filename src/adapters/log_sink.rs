//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::fsm::WakeSource;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { node } => {
                info!("START | node={}", node);
            }
            AppEvent::Woke { cause, previous } => {
                info!(
                    "WAKE  | cause={:?} | previous={}",
                    cause,
                    if *previous { "Raining" } else { "Not Raining" }
                );
            }
            AppEvent::PositionCommitted { engaged, duty } => {
                info!(
                    "SERVO | {} | duty={}",
                    if *engaged { "engaged" } else { "disengaged" },
                    duty
                );
            }
            AppEvent::CommandIgnored { param } => {
                info!("PARAM | ignored write to '{}'", param);
            }
            AppEvent::RainReported { raining, kind } => {
                info!("RAIN  | raining={} | via={:?}", raining, kind);
            }
            AppEvent::WakeArmed(WakeSource::Timer { duration_us }) => {
                info!("WAKE  | armed timer {} us", duration_us);
            }
            AppEvent::WakeArmed(WakeSource::EdgeLevel { pin, level }) => {
                info!("WAKE  | armed GPIO{} {:?}", pin, level);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
        }
    }
}

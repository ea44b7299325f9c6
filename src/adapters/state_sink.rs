//! Log-backed state sink.
//!
//! Stands in for the cloud parameter layer: every update is written to the
//! serial log, and notifications are marked so they stand out.  The last
//! value per parameter is kept so a console or test can read it back.

use log::{info, warn};

use crate::app::params::{ParamName, ParamValue};
use crate::app::ports::StateSink;

/// Capacity of the last-value table.  Each node has one parameter.
const MAX_PARAMS: usize = 4;

#[derive(Debug, Default)]
pub struct LogStateSink {
    values: heapless::Vec<(ParamName, ParamValue), MAX_PARAMS>,
    notifications: u32,
}

impl LogStateSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent value reported for `param`.
    pub fn value(&self, param: &str) -> Option<&ParamValue> {
        self.values
            .iter()
            .find(|(name, _)| name.as_str() == param)
            .map(|(_, v)| v)
    }

    /// Number of `update_and_notify` calls so far.
    pub fn notifications(&self) -> u32 {
        self.notifications
    }

    fn remember(&mut self, param: &str, value: &ParamValue) {
        if let Some(slot) = self.values.iter_mut().find(|(name, _)| name.as_str() == param) {
            slot.1 = value.clone();
            return;
        }
        let Ok(name) = ParamName::try_from(param) else {
            warn!("PARAM | name too long: {}", param);
            return;
        };
        if self.values.push((name, value.clone())).is_err() {
            warn!("PARAM | table full, not tracking {}", param);
        }
    }
}

impl StateSink for LogStateSink {
    fn update(&mut self, param: &str, value: &ParamValue) {
        info!("PARAM | {} = {}", param, value);
        self.remember(param, value);
    }

    fn update_and_notify(&mut self, param: &str, value: &ParamValue) {
        info!("PARAM | {} = {} | NOTIFY", param, value);
        self.notifications += 1;
        self.remember(param, value);
    }
}

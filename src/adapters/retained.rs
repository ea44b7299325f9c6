//! Rain flag retained across deep sleep.
//!
//! On ESP-IDF the flag lives in RTC slow memory (`.rtc.data`), which keeps
//! its contents through deep sleep and is re-initialised from the image on
//! a cold boot.  On the host it is an ordinary static.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::app::ports::RetainedFlagPort;

#[cfg_attr(target_os = "espidf", unsafe(link_section = ".rtc.data"))]
static WAS_RAINING: AtomicBool = AtomicBool::new(false);

/// Handle to the RTC-retained "was raining" flag.
///
/// There is exactly one flag in the image; construct one handle per boot.
pub struct RtcRainFlag;

impl RtcRainFlag {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RtcRainFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl RetainedFlagPort for RtcRainFlag {
    fn load(&self) -> bool {
        WAS_RAINING.load(Ordering::Relaxed)
    }

    fn store(&mut self, value: bool) {
        WAS_RAINING.store(value, Ordering::Relaxed);
    }
}

//! Digital rain sensor on a single GPIO.
//!
//! The sensor board's comparator output is active-low: HIGH while the
//! plate is dry, LOW once water bridges it.  This module only exposes the
//! raw level; the wake-cycle FSM does the inversion.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads the real GPIO level via hw_init helpers.
//! On host/test: reads a simulated line that defaults to HIGH (dry).

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin};

use crate::drivers::hw_init;
use crate::error;

/// The rain sensor's input line, as an `embedded-hal` input pin.
pub struct RainSensorPin {
    gpio: i32,
}

impl RainSensorPin {
    /// Configure `gpio` as an input and take ownership of it.
    pub fn new(gpio: i32) -> error::Result<Self> {
        hw_init::init_sensor_input(gpio)?;
        Ok(Self { gpio })
    }

    pub fn gpio(&self) -> i32 {
        self.gpio
    }
}

impl ErrorType for RainSensorPin {
    type Error = Infallible;
}

impl InputPin for RainSensorPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(hw_init::gpio_read(self.gpio))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!hw_init::gpio_read(self.gpio))
    }
}

/// Drive the simulated sensor line.  `true` = HIGH (dry).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_level(high: bool) {
    hw_init::sim_set_gpio_level(high);
}

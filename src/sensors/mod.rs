//! Sensor drivers.

pub mod rain;

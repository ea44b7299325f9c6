//! Hardware initialisation, register helpers, and power management.

pub mod hw_init;
pub mod sleep;

//! Application core: pure domain logic, zero I/O.
//!
//! The business rules for both nodes: the awning's command handling and
//! the rain sensor's wake cycle.  All interaction with hardware happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod commands;
pub mod events;
pub mod params;
pub mod ports;
pub mod service;

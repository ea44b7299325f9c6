//! Rainshade firmware library.
//!
//! Shared core of the awning and rain sensor nodes.  Exposes the
//! pure-logic modules for integration testing.  All ESP-IDF-specific code
//! is guarded by `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod fsm;
pub mod pins;

// Dual-target hardware layer; the real implementations are guarded by cfg
// attributes inside.
pub mod adapters;
pub mod drivers;
pub mod sensors;

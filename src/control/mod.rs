//! Actuator control algorithms.

pub mod servo;

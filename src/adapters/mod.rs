//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter      | Implements         | Connects to               |
//! |--------------|--------------------|---------------------------|
//! | `hardware`   | PwmPort            | ESP32 LEDC (servo)        |
//! |              | SleepPort          | ESP32 deep-sleep API      |
//! | `log_sink`   | EventSink          | Serial log output         |
//! | `nvs`        | ConfigPort         | NVS / in-memory store     |
//! |              | StoragePort        |                           |
//! | `retained`   | RetainedFlagPort   | RTC slow memory           |
//! | `state_sink` | StateSink          | Serial log output         |
//! | `time`       | DelayNs            | FreeRTOS task delay       |
//!
//! The sensor pin's `InputPin` lives in [`crate::sensors::rain`].

pub mod hardware;
pub mod log_sink;
pub mod nvs;
pub mod retained;
pub mod state_sink;
pub mod time;

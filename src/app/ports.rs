//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AwningService / RainSensorService (domain)
//! ```
//!
//! Driven adapters (PWM channel, sleep controller, retained memory, state
//! sink, storage) implement these traits.  The services consume them via
//! generics, so the domain core never touches hardware directly.
//!
//! Two hardware seams are not defined here because `embedded-hal` already
//! names them: the sensor pin is an [`embedded_hal::digital::InputPin`] and
//! the settle delays go through [`embedded_hal::delay::DelayNs`].
//!
//! Steady-state operations (duty commit, wake arming, retained writes) are
//! infallible at this boundary.  Only one-time peripheral setup returns an
//! error, and that error is fatal to the node.

use crate::app::params::ParamValue;
use crate::config::NodeConfig;
use crate::error::HwInitError;
use crate::fsm::{WakeKind, WakeLevel};

// ───────────────────────────────────────────────────────────────
// PWM port (driven adapter: domain → servo output)
// ───────────────────────────────────────────────────────────────

/// A single PWM channel, exclusively owned by the servo mapper.
pub trait PwmPort {
    /// One-time timer + channel setup on `pin`.
    fn configure_channel(
        &mut self,
        pin: i32,
        frequency_hz: u32,
        resolution_bits: u32,
    ) -> Result<(), HwInitError>;

    /// Stage a new duty count (0 .. 2^resolution_bits).
    fn set_duty(&mut self, duty: u32);

    /// Latch the staged duty into the output.
    fn commit(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Sleep port (driven adapter: domain → power management)
// ───────────────────────────────────────────────────────────────

/// Why the chip is running: first power-up or a deep-sleep wake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeCause {
    /// Cold boot or reset; retained memory holds its defaults.
    PowerOn,
    /// Timer wake source fired.
    Timer,
    /// GPIO wake source fired.
    Gpio,
    /// Any other cause, with the raw ESP-IDF code.
    Other(u32),
}

/// Deep-sleep wake arming and entry.
pub trait SleepPort {
    /// Disarm every wake source of `kind`.
    fn disable_wake_source(&mut self, kind: WakeKind);

    /// Arm a timer wake `duration_us` after sleep entry.
    fn enable_timer_wake(&mut self, duration_us: u64);

    /// Arm a GPIO wake when `pin` is at `level`.
    fn enable_edge_wake(&mut self, pin: i32, level: WakeLevel);

    /// Cut power to the CPU.  Execution resumes from reset.
    fn enter_deep_sleep(&mut self) -> !;

    /// What ended the previous sleep (or `PowerOn`).
    fn wake_cause(&self) -> WakeCause;
}

// ───────────────────────────────────────────────────────────────
// Retained flag port (domain ↔ memory that survives deep sleep)
// ───────────────────────────────────────────────────────────────

/// A single boolean that survives deep sleep but not a cold boot.
/// Reads `false` after a cold boot.
pub trait RetainedFlagPort {
    fn load(&self) -> bool;
    fn store(&mut self, value: bool);
}

// ───────────────────────────────────────────────────────────────
// State sink port (domain → cloud device parameters)
// ───────────────────────────────────────────────────────────────

/// The platform's device-parameter layer.  Both calls are fire-and-forget.
pub trait StateSink {
    /// Propagate `value` without raising an alert.
    fn update(&mut self, param: &str, value: &ParamValue);

    /// Propagate `value` and alert every subscriber.
    fn update_and_notify(&mut self, param: &str, value: &ParamValue);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists node configuration.
///
/// Implementations MUST validate before persisting.  Invalid ranges are
/// rejected with [`ConfigError::ValidationFailed`], not silently clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`NodeConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<NodeConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&mut self, config: &NodeConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ NVS / flash)
// ───────────────────────────────────────────────────────────────

/// Persistent key-value storage.
///
/// Keys are namespaced to prevent collisions between subsystems.  Writes
/// are atomic: the ESP-IDF NVS API guarantees this per `nvs_commit()`.
pub trait StoragePort {
    /// Read a value.  Returns the number of bytes written to `buf`.
    /// A stored value longer than `buf` is an error, not a truncated read.
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Write a value atomically.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Underlying storage is full.
    StorageFull,
    /// Generic I/O error from the storage backend.
    IoError,
}

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Storage partition is full.
    Full,
    /// Generic I/O error.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::StorageFull => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl From<StorageError> for ConfigError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound => Self::NotFound,
            StorageError::Full => Self::StorageFull,
            StorageError::IoError => Self::IoError,
        }
    }
}

//! Device parameters exchanged with the cloud platform.
//!
//! Each node registers one device carrying one primary parameter.  The
//! names here are the wire names the platform and mobile app use.

use serde::{Deserialize, Serialize};

/// Standard power parameter; the awning's primary (home screen) toggle.
pub const POWER_PARAM: &str = "Power";
/// Rain sensor alarm; read-only from the app side.
pub const WATER_ALARM_PARAM: &str = "water-alarm";

/// Maximum length of a parameter name or string value.
pub const PARAM_NAME_MAX: usize = 32;

/// Fixed-capacity parameter name.
pub type ParamName = heapless::String<PARAM_NAME_MAX>;

/// A parameter value as carried by the platform (JSON scalar).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(heapless::String<PARAM_NAME_MAX>),
}

impl ParamValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl core::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Str(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// Static description of a node and its single device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceInfo {
    pub node_name: &'static str,
    pub node_type: &'static str,
    pub device_name: &'static str,
    pub device_type: &'static str,
    /// The parameter shown on the app's home screen.
    pub primary_param: &'static str,
}

pub const AWNING_DEVICE: DeviceInfo = DeviceInfo {
    node_name: "Awning",
    node_type: "Switch",
    device_name: "Awning",
    device_type: "esp.device.blinds-external",
    primary_param: POWER_PARAM,
};

pub const RAIN_SENSOR_DEVICE: DeviceInfo = DeviceInfo {
    node_name: "Rain Sensor",
    node_type: "Other",
    device_name: "Rain Sensor",
    device_type: "esp.device.other",
    primary_param: WATER_ALARM_PARAM,
};

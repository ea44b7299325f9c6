//! Inbound commands to the awning service.
//!
//! The platform's write callback, the bench console, and tests all funnel
//! remote parameter writes into [`AppCommand`], which the
//! [`AwningService`](super::service::AwningService) interprets.

use super::params::{ParamName, ParamValue};

/// Where a parameter write came from.  Logged, never acted upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteSource {
    /// Initial value pushed by the platform at connect.
    Init,
    /// Mobile app / cloud.
    Cloud,
    /// A stored schedule fired.
    Schedule,
    /// A scene was activated.
    Scene,
    /// Local control over the LAN.
    Local,
    /// Line typed on the serial console.
    Console,
}

impl WriteSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Cloud => "cloud",
            Self::Schedule => "schedule",
            Self::Scene => "scene",
            Self::Local => "local",
            Self::Console => "console",
        }
    }
}

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// A remote write to one device parameter.
    WriteParam {
        name: ParamName,
        value: ParamValue,
        source: WriteSource,
    },
    /// Make the current position the boot default (console `save`).
    SaveDefault,
}

/// Console keyword for [`AppCommand::SaveDefault`].
pub const SAVE_KEYWORD: &str = "save";

/// Why a raw command could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandParseError {
    /// Parameter name longer than [`PARAM_NAME_MAX`](super::params::PARAM_NAME_MAX).
    NameTooLong,
    /// Payload is not a JSON scalar.
    BadPayload,
}

impl core::fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NameTooLong => write!(f, "parameter name too long"),
            Self::BadPayload => write!(f, "payload is not a JSON scalar"),
        }
    }
}

impl AppCommand {
    /// Decode a `(name, JSON payload)` pair as delivered by the platform.
    pub fn parse(
        name: &str,
        payload: &str,
        source: WriteSource,
    ) -> Result<Self, CommandParseError> {
        let name = ParamName::try_from(name).map_err(|_| CommandParseError::NameTooLong)?;
        let value: ParamValue =
            serde_json::from_str(payload.trim()).map_err(|_| CommandParseError::BadPayload)?;
        Ok(Self::WriteParam { name, value, source })
    }

    /// Decode a console line of the form `<param> <json>`, or `save`.
    pub fn parse_line(line: &str) -> Result<Self, CommandParseError> {
        let line = line.trim();
        if line == SAVE_KEYWORD {
            return Ok(Self::SaveDefault);
        }
        let (name, payload) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        Self::parse(name, payload, WriteSource::Console)
    }
}

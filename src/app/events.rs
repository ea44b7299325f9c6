//! Outbound application events.
//!
//! Both services emit these through the
//! [`EventSink`](super::ports::EventSink) port.  The log adapter turns them
//! into one-line serial records.

use super::params::ParamName;
use super::ports::WakeCause;
use crate::fsm::{CycleState, ReportKind, WakeSource};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// A service has started on the named node.
    Started { node: &'static str },

    /// The rain sensor woke; carries the cause and the retained reading.
    Woke { cause: WakeCause, previous: bool },

    /// A duty count was committed to the servo channel.
    PositionCommitted { engaged: bool, duty: u32 },

    /// A parameter write was acknowledged but not acted upon.
    CommandIgnored { param: ParamName },

    /// A rain reading went out through the state sink.
    RainReported { raining: bool, kind: ReportKind },

    /// The wake source for the coming sleep was armed.
    WakeArmed(WakeSource),

    /// The cycle FSM transitioned between states.
    StateChanged { from: CycleState, to: CycleState },
}

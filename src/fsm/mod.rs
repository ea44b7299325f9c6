//! Function-pointer state machine for the rain sensor's wake cycle.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  StateTable                                                  │
//! │  ┌─────────────────┬───────────┬──────────────────────────┐  │
//! │  │ CycleState      │ on_enter  │ on_update                │  │
//! │  ├─────────────────┼───────────┼──────────────────────────┤  │
//! │  │ Sampling        │:         │ fn(ctx)->Option<>        │  │
//! │  │ Reporting       │:         │ fn(ctx)->Option<>        │  │
//! │  │ ArmingTimerWake │ fn(ctx)   │ fn(ctx)->Option<>        │  │
//! │  │ ArmingEdgeWake  │ fn(ctx)   │ fn(ctx)->Option<>        │  │
//! │  │ Suspended       │:         │ fn(ctx)->Option<> (None) │  │
//! │  └─────────────────┴───────────┴──────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The table is pure: handlers only read and write the [`CycleContext`].
//! The [`RainSensorService`](crate::app::service::RainSensorService) owns
//! the hardware and performs the I/O belonging to the current state
//! (sample the pin, report, arm the wake source), records the result in
//! the context, and then calls [`Fsm::step`].
//!
//! A cycle always starts in `Sampling` and ends in `Suspended`.  There is
//! no transition out of `Suspended`: deep sleep resets the CPU and the next
//! cycle starts from a fresh boot.

pub mod context;
pub mod states;

use context::CycleContext;
use log::info;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// States of one wake cycle.
/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CycleState {
    Sampling = 0,
    Reporting = 1,
    ArmingTimerWake = 2,
    ArmingEdgeWake = 3,
    Suspended = 4,
}

impl CycleState {
    /// Total number of states: used to size the table array.
    pub const COUNT: usize = 5;

    /// Convert an index back to `CycleState`.  Out-of-range indices map to
    /// `Suspended`, the only state with no outgoing transition.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Sampling,
            1 => Self::Reporting,
            2 => Self::ArmingTimerWake,
            3 => Self::ArmingEdgeWake,
            _ => {
                debug_assert!(idx == 4, "invalid state index: {idx}");
                Self::Suspended
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Cycle vocabulary
// ---------------------------------------------------------------------------

/// Which state-sink path a reading is reported through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Value changed since the previous cycle: update and alert subscribers.
    Notify,
    /// Value unchanged: refresh silently.
    Update,
}

/// Electrical level that ends deep sleep on a GPIO wake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeLevel {
    Low,
    High,
}

/// Hardware wake source categories, for disabling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeKind {
    Timer,
    Gpio,
}

/// The single wake source armed before deep sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeSource {
    /// Wake after a fixed duration.
    Timer { duration_us: u64 },
    /// Wake when `pin` sits at `level`.
    EdgeLevel { pin: i32, level: WakeLevel },
}

impl WakeSource {
    pub fn kind(&self) -> WakeKind {
        match self {
            Self::Timer { .. } => WakeKind::Timer,
            Self::EdgeLevel { .. } => WakeKind::Gpio,
        }
    }
}

/// Outcome of classifying one raw sample against the previous report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading {
    /// Logical reading: `true` = raining.
    pub raining: bool,
    pub report: ReportKind,
}

/// Classify a raw pin level.
///
/// The sensor is active-low, so a HIGH pin means dry.  A reading that
/// differs from `previous` is an edge and goes out on the notify path.
pub fn evaluate(previous: bool, raw_high: bool) -> Reading {
    let raining = !raw_high;
    let report = if raining == previous {
        ReportKind::Update
    } else {
        ReportKind::Notify
    };
    Reading { raining, report }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` actions.  Runs exactly once per entry.
pub type StateActionFn = fn(&mut CycleContext);

/// Signature for the per-step update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut CycleContext) -> Option<CycleState>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single state.
pub struct StateDescriptor {
    pub id: CycleState,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The state machine engine for one wake cycle.
pub struct Fsm {
    /// Fixed-size table indexed by `CycleState as usize`.
    table: [StateDescriptor; CycleState::COUNT],
    /// Index of the currently active state.
    current: usize,
    /// Number of `step()` calls so far.
    steps: u32,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; CycleState::COUNT], initial: CycleState) -> Self {
        Self {
            table,
            current: initial as usize,
            steps: 0,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `step()`.
    pub fn start(&mut self, ctx: &mut CycleContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance by one step.  Returns `Some((from, to))` when a transition
    /// happened.
    pub fn step(&mut self, ctx: &mut CycleContext) -> Option<(CycleState, CycleState)> {
        self.steps += 1;
        let from = self.current_state();
        let next = (self.table[self.current].on_update)(ctx)?;
        self.transition(next, ctx);
        Some((from, next))
    }

    /// The current state's identity.
    pub fn current_state(&self) -> CycleState {
        CycleState::from_index(self.current)
    }

    /// `true` once the cycle has reached `Suspended`.
    pub fn is_terminal(&self) -> bool {
        self.current_state() == CycleState::Suspended
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: CycleState, ctx: &mut CycleContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        self.current = next_idx;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}

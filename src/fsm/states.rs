//! Concrete state handler functions and table builder.
//!
//! ```text
//!  SAMPLING ──[sampled]──▶ REPORTING ──[reported, raining]──▶ ARMING_TIMER_WAKE ──┐
//!                              │                                                 │
//!                              └──────[reported, dry]─────▶ ARMING_EDGE_WAKE ────┤
//!                                                                      [armed]   ▼
//!                                                                           SUSPENDED
//! ```

use super::context::CycleContext;
use super::{evaluate, CycleState, StateDescriptor, WakeLevel, WakeSource};
use log::{debug, info};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once per cycle.
pub fn build_state_table() -> [StateDescriptor; CycleState::COUNT] {
    [
        // Index 0: Sampling
        StateDescriptor {
            id: CycleState::Sampling,
            name: "Sampling",
            on_enter: None,
            on_update: sampling_update,
        },
        // Index 1: Reporting
        StateDescriptor {
            id: CycleState::Reporting,
            name: "Reporting",
            on_enter: None,
            on_update: reporting_update,
        },
        // Index 2: ArmingTimerWake
        StateDescriptor {
            id: CycleState::ArmingTimerWake,
            name: "ArmingTimerWake",
            on_enter: Some(arming_timer_enter),
            on_update: arming_update,
        },
        // Index 3: ArmingEdgeWake
        StateDescriptor {
            id: CycleState::ArmingEdgeWake,
            name: "ArmingEdgeWake",
            on_enter: Some(arming_edge_enter),
            on_update: arming_update,
        },
        // Index 4: Suspended
        StateDescriptor {
            id: CycleState::Suspended,
            name: "Suspended",
            on_enter: None,
            on_update: suspended_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  SAMPLING
// ═══════════════════════════════════════════════════════════════════════════

fn sampling_update(ctx: &mut CycleContext) -> Option<CycleState> {
    let raw_high = ctx.raw_high?;
    let reading = evaluate(ctx.previous, raw_high);
    debug!(
        "Sampling: raw={} -> raining={} ({:?})",
        if raw_high { "HIGH" } else { "LOW" },
        reading.raining,
        reading.report
    );
    ctx.reading = Some(reading);
    Some(CycleState::Reporting)
}

// ═══════════════════════════════════════════════════════════════════════════
//  REPORTING
// ═══════════════════════════════════════════════════════════════════════════

fn reporting_update(ctx: &mut CycleContext) -> Option<CycleState> {
    if !ctx.reported {
        return None;
    }
    let reading = ctx.reading?;
    if reading.raining {
        Some(CycleState::ArmingTimerWake)
    } else {
        Some(CycleState::ArmingEdgeWake)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  ARMING
// ═══════════════════════════════════════════════════════════════════════════

/// Raining: the pin is already LOW, so a level wake would fire at once.
/// Poll on a timer until the rain stops.
fn arming_timer_enter(ctx: &mut CycleContext) {
    ctx.wake = Some(WakeSource::Timer {
        duration_us: ctx.rain_recheck_us,
    });
    info!(
        "Rain detected, waking in {} s to re-check",
        ctx.rain_recheck_us / 1_000_000
    );
}

/// Dry: sleep until the sensor pulls the pin LOW.
fn arming_edge_enter(ctx: &mut CycleContext) {
    ctx.wake = Some(WakeSource::EdgeLevel {
        pin: ctx.sensor_pin,
        level: WakeLevel::Low,
    });
    info!("No rain detected, sleeping until GPIO{} goes low", ctx.sensor_pin);
}

fn arming_update(ctx: &mut CycleContext) -> Option<CycleState> {
    ctx.wake_armed.then_some(CycleState::Suspended)
}

// ═══════════════════════════════════════════════════════════════════════════
//  SUSPENDED
// ═══════════════════════════════════════════════════════════════════════════

fn suspended_update(_ctx: &mut CycleContext) -> Option<CycleState> {
    None
}

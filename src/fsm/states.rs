//! Concrete phase handlers and table builder.
//!
//! Each phase is one plain `fn` pointer with no captured state.  The
//! controller classifies every sample first and then runs exactly one
//! handler, so the priority order of the rules lives in
//! [`classify`](super::AlarmController::classify) and each handler only has
//! to deal with its own phase.
//!
//! ```text
//!            any phase ──[dist <= radius]──▶ INSIDE_ZONE (reset, OFF)
//!
//!  ARMED_WAITING ──[now - anchor >= cycle]──▶ SOUNDING (ON, anchor = now)
//!       ▲                                        │
//!       └──────[now - active_since >= active]────┘ (OFF)
//!
//!  any outside phase ──[stop()]──▶ COOLDOWN ──[now - stop >= cooldown]──▶ ARMED_WAITING
//! ```

use log::info;

use super::context::{ActuatorCommand, AlarmContext, AlarmEvent, Sample};
use super::{AlarmPhase, PhaseDescriptor};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static phase table.  Called once at startup.
pub fn build_phase_table() -> [PhaseDescriptor; AlarmPhase::COUNT] {
    [
        // Index 0: InsideZone
        PhaseDescriptor {
            id: AlarmPhase::InsideZone,
            name: "InsideZone",
            on_sample: inside_zone_sample,
        },
        // Index 1: Cooldown
        PhaseDescriptor {
            id: AlarmPhase::Cooldown,
            name: "Cooldown",
            on_sample: cooldown_sample,
        },
        // Index 2: ArmedWaiting
        PhaseDescriptor {
            id: AlarmPhase::ArmedWaiting,
            name: "ArmedWaiting",
            on_sample: armed_waiting_sample,
        },
        // Index 3: Sounding
        PhaseDescriptor {
            id: AlarmPhase::Sounding,
            name: "Sounding",
            on_sample: sounding_sample,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  INSIDE_ZONE: full reset, no memory across boundary crossings
// ═══════════════════════════════════════════════════════════════════════════

fn inside_zone_sample(ctx: &mut AlarmContext, _sample: &Sample) -> ActuatorCommand {
    ctx.state.enabled = true;
    ctx.state.manually_stopped = false;
    ctx.force_off();
    ctx.state.cycle_anchor = None;
    ActuatorCommand::Off
}

// ═══════════════════════════════════════════════════════════════════════════
//  COOLDOWN: suppressed after a manual stop
// ═══════════════════════════════════════════════════════════════════════════

fn cooldown_sample(ctx: &mut AlarmContext, sample: &Sample) -> ActuatorCommand {
    let elapsed = sample.now.saturating_sub(ctx.state.stop_timestamp);

    if elapsed >= ctx.timings.cooldown_ms {
        // Expiry only re-enables; the next sample arms a fresh dwell timer.
        ctx.state.enabled = true;
        ctx.state.manually_stopped = false;
        ctx.state.cycle_anchor = None;
        info!(
            "COOLDOWN: expired after {}ms, alarm re-enabled",
            elapsed
        );
    }

    ctx.force_off();
    ActuatorCommand::Off
}

// ═══════════════════════════════════════════════════════════════════════════
//  SOUNDING: buzzer on for the active duration
// ═══════════════════════════════════════════════════════════════════════════

fn sounding_sample(ctx: &mut AlarmContext, sample: &Sample) -> ActuatorCommand {
    let on_for = sample.now.saturating_sub(ctx.state.active_since);
    if on_for >= ctx.timings.active_duration_ms {
        ctx.force_off();
        info!("SOUNDING: buzzer off after {}ms", on_for);
        return ActuatorCommand::Off;
    }
    ActuatorCommand::Hold
}

// ═══════════════════════════════════════════════════════════════════════════
//  ARMED_WAITING: outside, unsuppressed, counting toward the next cycle
// ═══════════════════════════════════════════════════════════════════════════

fn armed_waiting_sample(ctx: &mut AlarmContext, sample: &Sample) -> ActuatorCommand {
    let anchor = *ctx.state.cycle_anchor.get_or_insert(sample.now);

    if !ctx.state.active && sample.now.saturating_sub(anchor) >= ctx.timings.cycle_interval_ms {
        ctx.state.active = true;
        ctx.state.active_since = sample.now;
        // The next countdown starts at activation, not at switch-off.
        ctx.state.cycle_anchor = Some(sample.now);
        info!(
            "ARMED: outside for {}ms ({:.6} {} from centre), buzzer on for {}ms",
            sample.now.saturating_sub(anchor),
            sample.distance,
            ctx.metric.unit(),
            ctx.timings.active_duration_ms
        );
        ctx.raise(AlarmEvent::Activated {
            position: sample.position,
            at: sample.now,
        });
        return ActuatorCommand::On;
    }

    ActuatorCommand::Hold
}

//! The Overseer: limited-use automatic rescue
//!
//! Fires when health drops to the activation threshold. One activation
//! raises the shield and jams trap deployment together and clears nearby
//! traps. The two effects then expire on independent timers; until both
//! have expired the guardian is busy and cannot fire again.

use serde::Serialize;

use super::events::{FeedbackCue, GameEvent};
use super::registry::EntityKind;
use super::state::{GameState, Player};
use super::timers::Effect;

/// Where the guardian is in its activation cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GuardianPhase {
    /// Ready to fire (if uses remain)
    Idle,
    /// Just fired: shield up and traps jammed
    ShieldAndJam,
    /// Jam expired first
    ShieldOnly,
    /// Shield expired first
    JamOnly,
}

impl GuardianPhase {
    pub fn of(player: &Player) -> Self {
        match (player.is_shielded, player.is_spawn_disabled) {
            (false, false) => GuardianPhase::Idle,
            (true, true) => GuardianPhase::ShieldAndJam,
            (true, false) => GuardianPhase::ShieldOnly,
            (false, true) => GuardianPhase::JamOnly,
        }
    }
}

/// Radius of the mercy clear around the player
pub fn clear_radius(state: &GameState) -> f32 {
    state.tuning.ability.radius * state.tuning.guardian.clear_radius_factor
}

/// Fire if health is at or below the threshold, uses remain and the guardian
/// is idle. Returns true if it fired.
pub fn try_intervene(state: &mut GameState) -> bool {
    if state.is_over() {
        return false;
    }
    let player = &state.player;
    if player.health > state.tuning.guardian.activation_health_threshold
        || player.interventions_left == 0
        || GuardianPhase::of(player) != GuardianPhase::Idle
    {
        return false;
    }

    state.player.interventions_left -= 1;
    state.player.is_shielded = true;
    state.player.is_spawn_disabled = true;

    let origin = state.player.pos;
    let doomed: Vec<_> = state
        .registry
        .query_within_radius(origin, clear_radius(state), Some(EntityKind::Trap))
        .iter()
        .map(|trap| trap.id)
        .collect();
    for id in &doomed {
        state.registry.destroy(*id);
    }

    let shield_at = state.deadline_after(state.tuning.guardian.shield_duration_ms);
    let jam_at = state.deadline_after(state.tuning.guardian.jam_duration_ms);
    state.timers.schedule(shield_at, Effect::ShieldExpires);
    state.timers.schedule(jam_at, Effect::JamExpires);

    log::info!(
        "Guardian intervened at health {:.0}: {} traps cleared, {} uses left",
        state.player.health,
        doomed.len(),
        state.player.interventions_left
    );
    state.emit(GameEvent::Feedback {
        cue: FeedbackCue::GuardianShield,
        severity: 0.6,
    });
    state.announce("OVERSEER: Breaking protocol. Activating Sanctuary Shield.");
    true
}

pub fn expire_shield(state: &mut GameState) {
    if !state.player.is_shielded {
        return;
    }
    state.player.is_shielded = false;
    state.announce("OVERSEER: Shield depleted. Resume caution.");
}

pub fn expire_jam(state: &mut GameState) {
    if !state.player.is_spawn_disabled {
        return;
    }
    state.player.is_spawn_disabled = false;
    state.announce("APEX: Systems restored. Resuming operations.");
}

//! Fixed timestep simulation tick
//!
//! Core game loop that advances the run deterministically. Subsystems run in
//! a fixed order so the same seed and inputs always replay the same run.

use super::events::GameEvent;
use super::state::GameState;
use super::timers::Effect;
use super::{ability, autopilot, avoidance, collision, guardian, narrative, outcome, spawn, threat};
use crate::secs_to_micros;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Trigger echolocation (edge, not held)
    pub ability: bool,
    /// Demo mode - the autopilot plays
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.is_over() {
        return;
    }

    let input = if input.autopilot {
        autopilot::steer(state)
    } else {
        input.clone()
    };

    state.time_ticks += 1;
    state.clock_us += secs_to_micros(dt);

    // Timed effects first so an expired shield no longer protects this tick
    let now = state.clock_us;
    for effect in state.timers.drain_due(now) {
        apply_effect(state, effect);
    }

    let speed = state.tuning.player.speed;
    state.player.steer(&input, speed);
    if input.ability {
        ability::echolocate(state);
    }

    spawn::run(state);

    let world = &state.tuning.world;
    let band_top = world.resource_bounce_inset;
    let band_bottom = world.viewport_height - world.resource_bounce_inset;
    let force = state.tuning.hazards.avoidance_force;
    avoidance::steer_resources(&mut state.registry, force, band_top, band_bottom);
    for entity in state.registry.iter_mut() {
        entity.integrate(dt);
    }

    collision::resolve(state);

    if !state.is_over() {
        let world_max = state.world_max();
        state.player.integrate(dt, world_max);

        threat::run(state);
        narrative::run(state);
        cleanup(state);
        outcome::evaluate(state);
    }

    let snapshot = state.snapshot(None);
    state.emit(GameEvent::Snapshot(snapshot));
    let progress = state.cooldown_progress();
    state.emit(GameEvent::CooldownProgress(progress));
}

/// Run a timer that came due
pub fn apply_effect(state: &mut GameState, effect: Effect) {
    match effect {
        Effect::ShieldExpires => guardian::expire_shield(state),
        Effect::JamExpires => guardian::expire_jam(state),
        Effect::AbilityReady => ability::recharge(state),
        Effect::RevealFades(id) => ability::fade_reveal(state, id),
    }
}

/// Drop everything that has fallen far enough behind the swimmer
fn cleanup(state: &mut GameState) {
    let horizon = state.player.pos.x - state.tuning.world.cleanup_horizon;
    let removed = state.registry.retain(|e| e.pos.x >= horizon);
    if removed > 0 {
        log::trace!("Cleaned up {} entities behind x={:.0}", removed, horizon);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::Settings;
    use crate::sim::outcome::Outcome;
    use crate::sim::registry::EntityKind;
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn run_for(state: &mut GameState, input: &TickInput, ticks: usize) {
        for _ in 0..ticks {
            tick(state, input, SIM_DT);
        }
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let settings = Settings::default().with_seed(99999);
        let mut state1 = GameState::new(Tuning::default(), &settings).unwrap();
        let mut state2 = GameState::new(Tuning::default(), &settings).unwrap();

        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        run_for(&mut state1, &input, 600);
        run_for(&mut state2, &input, 600);

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.registry.len(), state2.registry.len());
        assert_eq!(state1.player.pos, state2.player.pos);
        assert_eq!(state1.player.health, state2.player.health);
        assert_eq!(state1.player.antagonist_score, state2.player.antagonist_score);
    }

    #[test]
    fn test_tick_moves_player_and_reports() {
        let mut state = GameState::empty(Tuning::default(), 3);
        let start = state.player.pos;
        let input = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert!(state.player.pos.x > start.x);
        assert_eq!(state.time_ticks, 1);

        let events = state.drain_events();
        assert!(events.iter().any(|e| e.is_snapshot()));
        assert!(matches!(events.last(), Some(GameEvent::CooldownProgress(p)) if *p == 1.0));
    }

    #[test]
    fn test_terminal_state_ignores_ticks() {
        let mut state = GameState::empty(Tuning::default(), 3);
        outcome::conclude(&mut state, Outcome::Lost);
        state.drain_events();
        let pos = state.player.pos;

        run_for(&mut state, &TickInput { right: true, ..Default::default() }, 10);

        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.player.pos, pos);
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_shield_and_jam_expire_through_ticks() {
        let mut state = GameState::empty(Tuning::default(), 3);
        state.player.health = 20.0;
        assert!(guardian::try_intervene(&mut state));

        let idle = TickInput::default();
        // 4s of shield
        run_for(&mut state, &idle, 239);
        assert!(state.player.is_shielded);
        run_for(&mut state, &idle, 2);
        assert!(!state.player.is_shielded);
        assert!(state.player.is_spawn_disabled);
        // 6s of jam
        run_for(&mut state, &idle, 120);
        assert!(!state.player.is_spawn_disabled);
    }

    #[test]
    fn test_ability_recharges_after_cooldown() {
        let mut state = GameState::empty(Tuning::default(), 3);
        let ping = TickInput {
            ability: true,
            ..Default::default()
        };
        tick(&mut state, &ping, SIM_DT);
        assert!(!state.player.ability_ready);
        run_for(&mut state, &TickInput::default(), 215);
        assert!(state.player.ability_ready);
    }

    #[test]
    fn test_cleanup_behind_player() {
        let mut state = GameState::empty(Tuning::default(), 3);
        state.player.pos = Vec2::new(2000.0, 384.0);
        let behind = state
            .registry
            .spawn(EntityKind::Trap, Vec2::new(1300.0, 100.0), Vec2::ZERO);
        let near = state
            .registry
            .spawn(EntityKind::Trap, Vec2::new(1500.0, 100.0), Vec2::ZERO);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(!state.registry.contains(behind));
        assert!(state.registry.contains(near));
    }

    #[test]
    fn test_reaching_goal_wins() {
        let mut state = GameState::empty(Tuning::default(), 3);
        state.player.pos = Vec2::new(5974.0, 384.0);
        tick(&mut state, &TickInput { right: true, ..Default::default() }, SIM_DT);
        assert_eq!(state.outcome, Outcome::Won);
        assert!(state
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::Outcome(s) if s.won)));
    }
}

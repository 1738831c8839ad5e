//! Echolocation: the player's active reveal
//!
//! Marks nearby entities as revealed for the renderer, then recharges on a
//! cooldown. Reveal state is display-only.

use super::events::{FeedbackCue, GameEvent};
use super::registry::EntityId;
use super::state::GameState;
use super::timers::Effect;

/// Trigger echolocation. Ignored while recharging or after the run ends.
pub fn echolocate(state: &mut GameState) -> bool {
    if state.is_over() || !state.player.ability_ready {
        return false;
    }
    let now = state.clock_us;
    state.player.ability_ready = false;
    state.player.last_ability_us = Some(now);

    let revealed: Vec<EntityId> = state
        .registry
        .query_within_radius(state.player.pos, state.tuning.ability.radius, None)
        .iter()
        .map(|e| e.id)
        .collect();
    let fade_at = state.deadline_after(state.tuning.ability.duration_ms);
    for id in &revealed {
        if let Some(entity) = state.registry.get_mut(*id) {
            entity.revealed = true;
        }
        state.timers.schedule(fade_at, Effect::RevealFades(*id));
    }
    let ready_at = state.deadline_after(state.tuning.ability.cooldown_ms);
    state.timers.schedule(ready_at, Effect::AbilityReady);

    log::debug!("Echolocation revealed {} entities", revealed.len());
    state.emit(GameEvent::Feedback {
        cue: FeedbackCue::Echolocation,
        severity: 0.2,
    });
    state.announce("ECHO: ...listening...");
    true
}

/// Cooldown timer fired
pub fn recharge(state: &mut GameState) {
    state.player.ability_ready = true;
}

/// Reveal timer fired; the entity may already be gone
pub fn fade_reveal(state: &mut GameState, id: EntityId) {
    if let Some(entity) = state.registry.get_mut(id) {
        entity.revealed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::registry::EntityKind;
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn state() -> GameState {
        let mut state = GameState::empty(Tuning::default(), 13);
        state.player.pos = Vec2::new(500.0, 384.0);
        state
    }

    #[test]
    fn test_reveals_only_within_radius() {
        let mut state = state();
        let near = state
            .registry
            .spawn(EntityKind::Obstacle, Vec2::new(700.0, 384.0), Vec2::ZERO);
        let far = state
            .registry
            .spawn(EntityKind::Trap, Vec2::new(800.0, 384.0), Vec2::ZERO);
        assert!(echolocate(&mut state));
        assert!(state.registry.get(near).unwrap().revealed);
        assert!(!state.registry.get(far).unwrap().revealed);
        assert!(!state.player.ability_ready);
    }

    #[test]
    fn test_ignored_on_cooldown() {
        let mut state = state();
        assert!(echolocate(&mut state));
        assert!(!echolocate(&mut state));
        recharge(&mut state);
        assert!(echolocate(&mut state));
    }

    #[test]
    fn test_schedules_fade_and_recharge() {
        let mut state = state();
        let id = state
            .registry
            .spawn(EntityKind::Resource, Vec2::new(510.0, 384.0), Vec2::ZERO);
        echolocate(&mut state);
        assert_eq!(state.timers.drain_due(2_500_000), vec![Effect::RevealFades(id)]);
        assert_eq!(state.timers.drain_due(3_500_000), vec![Effect::AbilityReady]);
    }

    #[test]
    fn test_fade_of_destroyed_entity_is_safe() {
        let mut state = state();
        let id = state
            .registry
            .spawn(EntityKind::Obstacle, Vec2::new(510.0, 384.0), Vec2::ZERO);
        echolocate(&mut state);
        state.registry.destroy(id);
        fade_reveal(&mut state, id);
        assert!(!state.registry.contains(id));
    }
}

//! Contact detection and response
//!
//! Everything is a circle. Overlaps are collected first, then applied in a
//! fixed order (obstacles, resources, traps, goal) so one tick's result does
//! not depend on registry layout.

use super::events::{FeedbackCue, GameEvent};
use super::guardian;
use super::outcome::{self, Outcome};
use super::registry::{EntityId, EntityKind};
use super::state::GameState;
use crate::circles_overlap;

/// A single overlap found this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Obstacle(EntityId),
    Resource(EntityId),
    Trap(EntityId),
    /// Player reached the sanctuary
    Goal,
}

/// All current overlaps in resolution order
pub fn detect(state: &GameState) -> Vec<Contact> {
    let player = &state.player;
    let mut contacts = Vec::new();
    for kind in [EntityKind::Obstacle, EntityKind::Resource, EntityKind::Trap] {
        state.registry.for_each(kind, |e| {
            if circles_overlap(player.pos, player.radius, e.pos, e.radius) {
                contacts.push(match kind {
                    EntityKind::Obstacle => Contact::Obstacle(e.id),
                    EntityKind::Resource => Contact::Resource(e.id),
                    EntityKind::Trap => Contact::Trap(e.id),
                });
            }
        });
    }
    if outcome::reached_goal(state) {
        contacts.push(Contact::Goal);
    }
    contacts
}

/// Detect and apply every contact for this tick
pub fn resolve(state: &mut GameState) {
    if state.is_over() {
        return;
    }
    for contact in detect(state) {
        apply(state, contact);
    }
}

/// Apply one contact. Returns true if it changed anything.
pub fn apply(state: &mut GameState, contact: Contact) -> bool {
    if state.is_over() {
        return false;
    }
    match contact {
        Contact::Obstacle(id) => hit_obstacle(state, id),
        Contact::Resource(id) => eat_resource(state, id),
        Contact::Trap(id) => hit_trap(state, id),
        Contact::Goal => outcome::conclude(state, Outcome::Won),
    }
}

fn hit_obstacle(state: &mut GameState, id: EntityId) -> bool {
    if state.player.is_shielded || !state.registry.destroy(id) {
        return false;
    }
    let bounty = state.tuning.hazards.obstacle_bounty;
    let amount = state.tuning.hazards.obstacle_damage;
    state.player.award_antagonist(bounty);
    damage(state, amount, FeedbackCue::ObstacleHit, 0.5);
    log::debug!("Obstacle {} hit player, health {:.0}", id, state.player.health);
    state.announce(format!("ECHO ate plastic! APEX: +${}", bounty));
    after_damage(state);
    true
}

fn hit_trap(state: &mut GameState, id: EntityId) -> bool {
    if state.player.is_shielded || !state.registry.contains(id) {
        return false;
    }
    let amount = state.tuning.hazards.trap_damage;
    damage(state, amount, FeedbackCue::TrapSnag, 0.25);
    state.player.slow(state.tuning.hazards.trap_slow_factor);
    log::trace!("Snagged in trap {}, health {:.0}", id, state.player.health);
    after_damage(state);
    true
}

fn eat_resource(state: &mut GameState, id: EntityId) -> bool {
    if !state.registry.destroy(id) {
        return false;
    }
    let heal = state.tuning.hazards.resource_heal;
    state.player.heal(heal);
    state.emit(GameEvent::Feedback {
        cue: FeedbackCue::Heal,
        severity: 0.3,
    });
    state.announce(format!("ECHO: Found real food! +{} HP", heal));
    true
}

/// Subtract health and ask the renderer for a hit cue
pub fn damage(state: &mut GameState, amount: f32, cue: FeedbackCue, severity: f32) {
    state.player.apply_damage(amount);
    state.emit(GameEvent::Feedback { cue, severity });
}

/// Death ends the run; otherwise a low-health hit may summon the guardian
pub fn after_damage(state: &mut GameState) {
    if state.player.is_dead() {
        outcome::conclude(state, Outcome::Lost);
    } else {
        guardian::try_intervene(state);
    }
}

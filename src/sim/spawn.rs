//! Hazard and resource spawning
//!
//! Each kind runs its own periodic timer. Placement is ahead of the player
//! and never within the goal margin, so the final approach stays clear.

use glam::Vec2;
use rand::Rng;

use super::registry::{EntityId, EntityKind};
use super::state::GameState;
use crate::millis_to_micros;
use crate::tuning::{Span, SpawnRule, SpawnTuning};

/// Per-kind periodic spawn timers
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    next_obstacle_us: u64,
    next_trap_us: u64,
    next_resource_us: u64,
    stopped: bool,
}

fn draw_interval_us<R: Rng + ?Sized>(rule: &SpawnRule, rng: &mut R) -> u64 {
    let ms = if rule.interval_max_ms > rule.interval_min_ms {
        rng.random_range(rule.interval_min_ms..=rule.interval_max_ms)
    } else {
        rule.interval_min_ms
    };
    // Zero intervals are rejected by validation; never loop forever on one anyway
    millis_to_micros(ms.max(1))
}

impl SpawnScheduler {
    /// Timers armed so each kind first fires one (minimum) interval after `now_us`
    pub fn new(rules: &SpawnTuning, now_us: u64) -> Self {
        Self {
            next_obstacle_us: now_us + millis_to_micros(rules.obstacle.interval_min_ms.max(1)),
            next_trap_us: now_us + millis_to_micros(rules.trap.interval_min_ms.max(1)),
            next_resource_us: now_us + millis_to_micros(rules.resource.interval_min_ms.max(1)),
            stopped: false,
        }
    }

    fn slot_mut(&mut self, kind: EntityKind) -> &mut u64 {
        match kind {
            EntityKind::Obstacle => &mut self.next_obstacle_us,
            EntityKind::Trap => &mut self.next_trap_us,
            EntityKind::Resource => &mut self.next_resource_us,
        }
    }

    pub fn next_due(&self, kind: EntityKind) -> u64 {
        match kind {
            EntityKind::Obstacle => self.next_obstacle_us,
            EntityKind::Trap => self.next_trap_us,
            EntityKind::Resource => self.next_resource_us,
        }
    }

    /// Kinds whose timers fired by `now_us`, one entry per firing.
    /// Each firing re-arms its timer with a freshly drawn interval.
    pub fn due<R: Rng + ?Sized>(
        &mut self,
        now_us: u64,
        rules: &SpawnTuning,
        rng: &mut R,
    ) -> Vec<EntityKind> {
        let mut fired = Vec::new();
        if self.stopped {
            return fired;
        }
        for kind in EntityKind::ALL {
            let rule = rules.rule(kind);
            let slot = self.slot_mut(kind);
            while *slot <= now_us {
                fired.push(kind);
                *slot += draw_interval_us(rule, rng);
            }
        }
        fired
    }

    /// Disarm every timer; idempotent
    pub fn stop(&mut self) {
        if !self.stopped {
            log::debug!("Spawn timers stopped");
        }
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

/// Place one entity of `kind`. `initial` uses the rule's absolute opening band.
///
/// Returns `None` when the spawn is suppressed: traps while jammed, or any
/// position at or past `goal_distance - goal_margin`.
pub fn spawn_entity(state: &mut GameState, kind: EntityKind, initial: bool) -> Option<EntityId> {
    if kind == EntityKind::Trap && state.player.is_spawn_disabled {
        log::debug!("Trap spawn suppressed: deployment jammed");
        return None;
    }

    let world = &state.tuning.world;
    let rule = state.tuning.spawns.rule(kind);
    let rng = &mut state.rng;

    let x = match (initial, rule.initial_x) {
        (true, Some(band)) => band.sample(rng),
        _ => {
            let mut ahead = state.player.pos.x + rule.lead.sample(rng);
            if rule.lead_past_viewport {
                ahead += world.viewport_width;
            }
            ahead
        }
    };
    let limit = world.goal_distance - rule.goal_margin;
    if x >= limit {
        log::trace!("{} spawn at x={:.0} suppressed (limit {:.0})", kind.as_str(), x, limit);
        return None;
    }

    let lateral = Span::new(rule.lateral_inset, world.viewport_height - rule.lateral_inset);
    let pos = Vec2::new(x, lateral.sample(rng));
    let vel = Vec2::new(rule.velocity_x.sample(rng), rule.velocity_y.sample(rng));
    let avoidance_radius = match kind {
        EntityKind::Trap => state.tuning.hazards.trap_avoidance_radius,
        EntityKind::Resource => state.tuning.hazards.resource_avoidance_radius,
        EntityKind::Obstacle => 0.0,
    };
    let radius = rule.radius;

    let id = state
        .registry
        .spawn_sized(kind, pos, vel, radius, avoidance_radius);
    log::debug!("Spawned {} {} at ({:.0}, {:.0})", kind.as_str(), id, pos.x, pos.y);

    if kind == EntityKind::Trap {
        let bounty = state.tuning.hazards.trap_bounty;
        state.player.award_antagonist(bounty);
        state.announce(format!("APEX: Fishnet deployed. Quota +${}", bounty));
    }
    Some(id)
}

/// Opening population so the first stretch is not empty
pub fn populate_initial(state: &mut GameState) {
    for kind in [EntityKind::Obstacle, EntityKind::Resource, EntityKind::Trap] {
        let count = state.tuning.spawns.rule(kind).initial_count;
        for _ in 0..count {
            spawn_entity(state, kind, true);
        }
    }
}

/// Fire any due spawn timers
pub fn run(state: &mut GameState) {
    if state.is_over() {
        return;
    }
    let now = state.clock_us;
    let fired = state.spawner.due(now, &state.tuning.spawns, &mut state.rng);
    for kind in fired {
        spawn_entity(state, kind, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn state() -> GameState {
        GameState::empty(Tuning::default(), 11)
    }

    #[test]
    fn test_timers_fire_independently() {
        let mut state = state();
        let rules = state.tuning.spawns.clone();
        let mut scheduler = SpawnScheduler::new(&rules, 0);

        assert!(scheduler.due(3_499_999, &rules, &mut state.rng).is_empty());
        assert_eq!(scheduler.due(3_500_000, &rules, &mut state.rng), vec![EntityKind::Obstacle]);
        assert_eq!(scheduler.due(4_500_000, &rules, &mut state.rng), vec![EntityKind::Resource]);
        assert_eq!(scheduler.due(5_000_000, &rules, &mut state.rng), vec![EntityKind::Trap]);
        // Resource re-armed within its 4.5..6 s band
        let next = scheduler.next_due(EntityKind::Resource);
        assert!((9_000_000..=10_500_000).contains(&next));
    }

    #[test]
    fn test_intervals_configurable_per_kind() {
        let mut state = state();
        let mut rules = state.tuning.spawns.clone();
        rules.trap.interval_min_ms = 1000;
        rules.trap.interval_max_ms = 1000;
        let mut scheduler = SpawnScheduler::new(&rules, 0);
        let fired = scheduler.due(3_000_000, &rules, &mut state.rng);
        assert_eq!(fired, vec![EntityKind::Trap; 3]);
    }

    #[test]
    fn test_stopped_scheduler_fires_nothing() {
        let mut state = state();
        let rules = state.tuning.spawns.clone();
        let mut scheduler = SpawnScheduler::new(&rules, 0);
        scheduler.stop();
        scheduler.stop();
        assert!(scheduler.due(u64::MAX / 2, &rules, &mut state.rng).is_empty());
    }

    #[test]
    fn test_spawn_ahead_of_player_within_band() {
        let mut state = state();
        let id = spawn_entity(&mut state, EntityKind::Obstacle, false).unwrap();
        let e = state.registry.get(id).unwrap();
        let min_x = state.player.pos.x + 1024.0 + 50.0;
        assert!(e.pos.x >= min_x && e.pos.x <= min_x + 250.0);
        assert!(e.pos.y >= 80.0 && e.pos.y <= 768.0 - 80.0);
        assert!(e.vel.x < 0.0);
    }

    #[test]
    fn test_spawn_suppressed_near_goal() {
        let mut state = state();
        state.player.pos.x = 5600.0;
        for kind in EntityKind::ALL {
            assert!(spawn_entity(&mut state, kind, false).is_none());
        }
        assert!(state.registry.is_empty());
        assert_eq!(state.player.antagonist_score, 0);
    }

    #[test]
    fn test_trap_spawn_pays_antagonist_and_announces() {
        let mut state = state();
        let id = spawn_entity(&mut state, EntityKind::Trap, false).unwrap();
        let trap = state.registry.get(id).unwrap();
        assert_eq!(trap.vel, Vec2::ZERO);
        assert_eq!(trap.avoidance_radius, 120.0);
        assert_eq!(state.player.antagonist_score, 100);
        assert_eq!(state.drain_events().len(), 1);
    }

    #[test]
    fn test_trap_spawn_suppressed_while_jammed() {
        let mut state = state();
        state.player.is_spawn_disabled = true;
        assert!(spawn_entity(&mut state, EntityKind::Trap, false).is_none());
        assert!(spawn_entity(&mut state, EntityKind::Obstacle, false).is_some());
        assert!(spawn_entity(&mut state, EntityKind::Resource, false).is_some());
        assert_eq!(state.player.antagonist_score, 0);
    }

    #[test]
    fn test_initial_population() {
        let mut state = state();
        populate_initial(&mut state);
        assert_eq!(state.registry.count(EntityKind::Obstacle), 30);
        assert_eq!(state.registry.count(EntityKind::Resource), 15);
        assert_eq!(state.registry.count(EntityKind::Trap), 10);
        state.registry.for_each(EntityKind::Obstacle, |e| {
            assert!(e.pos.x >= 300.0 && e.pos.x <= 1200.0);
        });
    }

    #[test]
    fn test_run_spawns_on_schedule() {
        let mut state = state();
        state.clock_us = 3_500_000;
        run(&mut state);
        assert_eq!(state.registry.count(EntityKind::Obstacle), 1);
        run(&mut state);
        assert_eq!(state.registry.count(EntityKind::Obstacle), 1);
    }
}

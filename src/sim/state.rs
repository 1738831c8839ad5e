//! Game state and core simulation types
//!
//! `GameState` is the single owner of everything a run mutates. Each
//! subsystem is a set of functions taking `&mut GameState`, so any of them
//! can be driven in isolation from a test.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::events::{GameEvent, StateSnapshot};
use super::narrative::NarrativeTrigger;
use super::outcome::Outcome;
use super::registry::EntityRegistry;
use super::spawn::{self, SpawnScheduler};
use super::threat::ThreatAssessment;
use super::tick::TickInput;
use super::timers::TimerQueue;
use crate::consts::*;
use crate::error::TuningError;
use crate::settings::Settings;
use crate::tuning::Tuning;
use crate::millis_to_micros;

/// The swimmer
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Always within `[0, max_health]`
    pub health: f32,
    pub max_health: f32,
    /// Echolocation can be triggered
    pub ability_ready: bool,
    /// Clock time of the last echolocation (for cooldown progress)
    pub last_ability_us: Option<u64>,
    /// Guardian rescues remaining; only ever decremented
    pub interventions_left: u32,
    /// Immune to hazard damage
    pub is_shielded: bool,
    /// Trap deployment jammed
    pub is_spawn_disabled: bool,
    /// Antagonist profit; only ever incremented
    pub antagonist_score: u64,
}

impl Player {
    pub fn new(pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: PLAYER_RADIUS,
            health: tuning.player.max_health,
            max_health: tuning.player.max_health,
            ability_ready: true,
            last_ability_us: None,
            interventions_left: tuning.guardian.max_uses,
            is_shielded: false,
            is_spawn_disabled: false,
            antagonist_score: 0,
        }
    }

    /// Subtract health, clamped at zero. Returns the new health.
    pub fn apply_damage(&mut self, amount: f32) -> f32 {
        self.health = (self.health - amount.max(0.0)).clamp(0.0, self.max_health);
        self.health
    }

    /// Add health, clamped at `max_health`. Returns the new health.
    pub fn heal(&mut self, amount: f32) -> f32 {
        self.health = (self.health + amount.max(0.0)).clamp(0.0, self.max_health);
        self.health
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub fn award_antagonist(&mut self, amount: u64) {
        self.antagonist_score = self.antagonist_score.saturating_add(amount);
    }

    /// Whole units travelled from the world origin
    pub fn distance_traveled(&self) -> u32 {
        self.pos.x.max(0.0).floor() as u32
    }

    /// Set velocity from directional intent. Opposing keys resolve to right/down.
    pub fn steer(&mut self, input: &TickInput, speed: f32) {
        let mut vel = Vec2::ZERO;
        if input.left {
            vel.x = -speed;
        }
        if input.right {
            vel.x = speed;
        }
        if input.up {
            vel.y = -speed;
        }
        if input.down {
            vel.y = speed;
        }
        self.vel = vel;
    }

    /// Scale velocity on both axes
    pub fn slow(&mut self, factor: f32) {
        self.vel *= factor;
    }

    /// Move by velocity and clamp to the world rectangle
    pub fn integrate(&mut self, dt: f32, world_max: Vec2) {
        self.pos += self.vel * dt;
        self.pos = self.pos.clamp(Vec2::ZERO, world_max);
    }
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    /// HUD sensor panel enabled for this run
    pub threat_detection: bool,
    /// Run seed
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Monotonic simulation clock
    pub clock_us: u64,
    pub player: Player,
    pub registry: EntityRegistry,
    pub spawner: SpawnScheduler,
    pub timers: TimerQueue,
    pub threat: ThreatAssessment,
    pub narrative: NarrativeTrigger,
    pub outcome: Outcome,
    /// Outbound events waiting to be drained
    events: Vec<GameEvent>,
}

impl GameState {
    /// Start a run: validates tuning, places the player and seeds the opening stretch
    pub fn new(tuning: Tuning, settings: &Settings) -> Result<Self, TuningError> {
        tuning.validate()?;
        let seed = settings.resolve_seed();
        let mut state = Self::empty(tuning, seed);
        state.threat_detection = settings.threat_detection;
        spawn::populate_initial(&mut state);
        log::info!(
            "Run started (seed {}): {} entities, goal at {}",
            seed,
            state.registry.len(),
            state.tuning.world.goal_distance
        );
        Ok(state)
    }

    /// A run with no entities; tests build scenarios on top of this
    pub fn empty(tuning: Tuning, seed: u64) -> Self {
        let start = Vec2::new(PLAYER_START_X, tuning.world.viewport_height / 2.0);
        let player = Player::new(start, &tuning);
        let spawner = SpawnScheduler::new(&tuning.spawns, 0);
        Self {
            threat_detection: false,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            clock_us: 0,
            player,
            registry: EntityRegistry::new(),
            spawner,
            timers: TimerQueue::new(),
            threat: ThreatAssessment::default(),
            narrative: NarrativeTrigger::default(),
            outcome: Outcome::Playing,
            events: Vec::new(),
            tuning,
        }
    }

    /// Clock time `ms` milliseconds from now
    pub fn deadline_after(&self, ms: u32) -> u64 {
        self.clock_us + millis_to_micros(ms)
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// Bottom-right corner of the swimmable world
    pub fn world_max(&self) -> Vec2 {
        Vec2::new(
            self.tuning.world.goal_distance + WORLD_OVERRUN,
            self.tuning.world.viewport_height,
        )
    }

    /// Echolocation recharge in `[0, 1]`
    pub fn cooldown_progress(&self) -> f32 {
        if self.player.ability_ready {
            return 1.0;
        }
        let Some(last) = self.player.last_ability_us else {
            return 1.0;
        };
        let cooldown = millis_to_micros(self.tuning.ability.cooldown_ms) as f64;
        let elapsed = self.clock_us.saturating_sub(last) as f64;
        (elapsed / cooldown).min(1.0) as f32
    }

    pub fn snapshot(&self, message: Option<String>) -> StateSnapshot {
        StateSnapshot {
            health: self.player.health,
            max_health: self.player.max_health,
            distance: self.player.distance_traveled(),
            ability_ready: self.player.ability_ready,
            interventions_left: self.player.interventions_left,
            antagonist_score: self.player.antagonist_score,
            is_shielded: self.player.is_shielded,
            is_jammed: self.player.is_spawn_disabled,
            outcome: self.outcome,
            message,
        }
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Emit a snapshot carrying a log line for the HUD message feed
    pub fn announce(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::debug!("{}", message);
        let snapshot = self.snapshot(Some(message));
        self.emit(GameEvent::Snapshot(snapshot));
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all pending events, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

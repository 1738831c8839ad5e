//! Data-driven game balance
//!
//! Every number the simulation reads lives here so designers can retune a run
//! from JSON without touching code. `Tuning::default()` is the shipped balance.

use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::TuningError;
use crate::sim::narrative::{StoryBeat, default_story};
use crate::sim::registry::EntityKind;

/// Inclusive numeric range sampled uniformly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Uniform sample in `[min, max]`; degenerate spans return `min`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max > self.min {
            rng.random_range(self.min..=self.max)
        } else {
            self.min
        }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    fn check(&self, field: &'static str) -> Result<(), TuningError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(TuningError::invalid(field, "bounds must be finite"));
        }
        if self.min > self.max {
            return Err(TuningError::invalid(
                field,
                format!("min {} exceeds max {}", self.min, self.max),
            ));
        }
        Ok(())
    }
}

/// World geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    /// Visible viewport width (spawns are placed past the leading edge)
    pub viewport_width: f32,
    /// Playable vertical extent
    pub viewport_height: f32,
    /// X coordinate of the sanctuary (goal boundary)
    pub goal_distance: f32,
    /// Entities further than this behind the player are destroyed
    pub cleanup_horizon: f32,
    /// Resources bounce off a band this far inside the top/bottom edges
    pub resource_bounce_inset: f32,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            viewport_width: 1024.0,
            viewport_height: 768.0,
            goal_distance: 6000.0,
            cleanup_horizon: 600.0,
            resource_bounce_inset: 50.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Swim speed per axis (units/s)
    pub speed: f32,
    pub max_health: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: 220.0,
            max_health: 100.0,
        }
    }
}

/// Echolocation: short-range active reveal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityTuning {
    pub cooldown_ms: u32,
    /// How long revealed entities stay revealed
    pub duration_ms: u32,
    pub radius: f32,
}

impl Default for AbilityTuning {
    fn default() -> Self {
        Self {
            cooldown_ms: 3500,
            duration_ms: 2500,
            radius: 250.0,
        }
    }
}

/// Contact effects and antagonist payouts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardTuning {
    pub obstacle_damage: f32,
    /// Antagonist score gained when an obstacle hits the player
    pub obstacle_bounty: u64,
    pub trap_damage: f32,
    /// Velocity multiplier applied on trap contact (both axes)
    pub trap_slow_factor: f32,
    /// Antagonist score gained per trap deployed
    pub trap_bounty: u64,
    pub resource_heal: f32,
    pub trap_avoidance_radius: f32,
    pub resource_avoidance_radius: f32,
    /// Magnitude of the escape vector resources blend in near traps
    pub avoidance_force: f32,
}

impl Default for HazardTuning {
    fn default() -> Self {
        Self {
            obstacle_damage: 12.0,
            obstacle_bounty: 50,
            trap_damage: 3.0,
            trap_slow_factor: 0.3,
            trap_bounty: 100,
            resource_heal: 18.0,
            trap_avoidance_radius: 120.0,
            resource_avoidance_radius: 100.0,
            avoidance_force: 80.0,
        }
    }
}

/// Placement and cadence for one entity kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnRule {
    pub interval_min_ms: u32,
    pub interval_max_ms: u32,
    /// Offset ahead of the player
    pub lead: Span,
    /// Add the viewport width to the lead (spawn off-screen)
    pub lead_past_viewport: bool,
    /// Distance kept from the top and bottom of the playable band
    pub lateral_inset: f32,
    /// Spawns at or beyond `goal_distance - goal_margin` are suppressed
    pub goal_margin: f32,
    pub velocity_x: Span,
    pub velocity_y: Span,
    pub radius: f32,
    /// Force-spawned at scene start
    pub initial_count: u32,
    /// Absolute x band for the initial population (`None` uses `lead`)
    pub initial_x: Option<Span>,
}

impl SpawnRule {
    fn check(&self, field: &'static str) -> Result<(), TuningError> {
        if self.interval_min_ms == 0 {
            return Err(TuningError::invalid(field, "spawn interval must be non-zero"));
        }
        if self.interval_min_ms > self.interval_max_ms {
            return Err(TuningError::invalid(field, "interval min exceeds max"));
        }
        self.lead.check(field)?;
        self.velocity_x.check(field)?;
        self.velocity_y.check(field)?;
        if let Some(initial) = &self.initial_x {
            initial.check(field)?;
        }
        if self.radius <= 0.0 {
            return Err(TuningError::invalid(field, "radius must be positive"));
        }
        Ok(())
    }
}

/// Per-kind spawn rules. Each kind deserializes as an overlay on its own
/// shipped rule, so a file only names the fields it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "SpawnOverrides")]
pub struct SpawnTuning {
    pub obstacle: SpawnRule,
    pub trap: SpawnRule,
    pub resource: SpawnRule,
}

impl SpawnTuning {
    pub fn rule(&self, kind: EntityKind) -> &SpawnRule {
        match kind {
            EntityKind::Obstacle => &self.obstacle,
            EntityKind::Trap => &self.trap,
            EntityKind::Resource => &self.resource,
        }
    }
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            obstacle: SpawnRule {
                interval_min_ms: 3500,
                interval_max_ms: 3500,
                lead: Span::new(50.0, 300.0),
                lead_past_viewport: true,
                lateral_inset: 80.0,
                goal_margin: 200.0,
                velocity_x: Span::new(-40.0, -20.0),
                velocity_y: Span::new(-15.0, 15.0),
                radius: 20.0,
                initial_count: 30,
                initial_x: Some(Span::new(300.0, 1200.0)),
            },
            trap: SpawnRule {
                interval_min_ms: 5000,
                interval_max_ms: 5000,
                lead: Span::new(150.0, 500.0),
                lead_past_viewport: false,
                lateral_inset: 120.0,
                goal_margin: 300.0,
                velocity_x: Span::new(0.0, 0.0),
                velocity_y: Span::new(0.0, 0.0),
                radius: 40.0,
                initial_count: 10,
                initial_x: None,
            },
            resource: SpawnRule {
                interval_min_ms: 4500,
                interval_max_ms: 6000,
                lead: Span::new(50.0, 300.0),
                lead_past_viewport: true,
                lateral_inset: 100.0,
                goal_margin: 200.0,
                velocity_x: Span::new(-30.0, -15.0),
                velocity_y: Span::new(-10.0, 10.0),
                radius: 18.0,
                initial_count: 15,
                initial_x: Some(Span::new(250.0, 1400.0)),
            },
        }
    }
}

/// Fields present in a tuning file for one spawn kind
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SpawnRuleOverride {
    interval_min_ms: Option<u32>,
    interval_max_ms: Option<u32>,
    lead: Option<Span>,
    lead_past_viewport: Option<bool>,
    lateral_inset: Option<f32>,
    goal_margin: Option<f32>,
    velocity_x: Option<Span>,
    velocity_y: Option<Span>,
    radius: Option<f32>,
    initial_count: Option<u32>,
    /// Outer `None`: absent. `Some(None)`: explicit `null`.
    #[serde(deserialize_with = "present")]
    initial_x: Option<Option<Span>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl SpawnRuleOverride {
    fn apply(self, mut rule: SpawnRule) -> SpawnRule {
        if let Some(v) = self.interval_min_ms {
            rule.interval_min_ms = v;
        }
        if let Some(v) = self.interval_max_ms {
            rule.interval_max_ms = v;
        }
        if let Some(v) = self.lead {
            rule.lead = v;
        }
        if let Some(v) = self.lead_past_viewport {
            rule.lead_past_viewport = v;
        }
        if let Some(v) = self.lateral_inset {
            rule.lateral_inset = v;
        }
        if let Some(v) = self.goal_margin {
            rule.goal_margin = v;
        }
        if let Some(v) = self.velocity_x {
            rule.velocity_x = v;
        }
        if let Some(v) = self.velocity_y {
            rule.velocity_y = v;
        }
        if let Some(v) = self.radius {
            rule.radius = v;
        }
        if let Some(v) = self.initial_count {
            rule.initial_count = v;
        }
        if let Some(v) = self.initial_x {
            rule.initial_x = v;
        }
        rule
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SpawnOverrides {
    obstacle: SpawnRuleOverride,
    trap: SpawnRuleOverride,
    resource: SpawnRuleOverride,
}

impl From<SpawnOverrides> for SpawnTuning {
    fn from(overrides: SpawnOverrides) -> Self {
        let defaults = SpawnTuning::default();
        Self {
            obstacle: overrides.obstacle.apply(defaults.obstacle),
            trap: overrides.trap.apply(defaults.trap),
            resource: overrides.resource.apply(defaults.resource),
        }
    }
}

/// The limited-use rescue mechanic
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardianTuning {
    pub max_uses: u32,
    pub shield_duration_ms: u32,
    pub jam_duration_ms: u32,
    /// Fires when health drops to or below this
    pub activation_health_threshold: f32,
    /// Traps within `ability.radius * clear_radius_factor` are destroyed
    pub clear_radius_factor: f32,
}

impl Default for GuardianTuning {
    fn default() -> Self {
        Self {
            max_uses: 2,
            shield_duration_ms: 4000,
            jam_duration_ms: 6000,
            activation_health_threshold: 25.0,
            clear_radius_factor: 1.5,
        }
    }
}

/// Passive hazard sensor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreatTuning {
    pub detection_range: f32,
    pub cadence_ms: u32,
}

impl Default for ThreatTuning {
    fn default() -> Self {
        Self {
            detection_range: 1000.0,
            cadence_ms: 100,
        }
    }
}

/// Complete tunable configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub world: WorldTuning,
    pub player: PlayerTuning,
    pub ability: AbilityTuning,
    pub hazards: HazardTuning,
    pub spawns: SpawnTuning,
    pub guardian: GuardianTuning,
    pub threat: ThreatTuning,
    #[serde(default = "default_story")]
    pub story: Vec<StoryBeat>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            world: WorldTuning::default(),
            player: PlayerTuning::default(),
            ability: AbilityTuning::default(),
            hazards: HazardTuning::default(),
            spawns: SpawnTuning::default(),
            guardian: GuardianTuning::default(),
            threat: ThreatTuning::default(),
            story: default_story(),
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON document; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let world = &self.world;
        if world.goal_distance <= 0.0 {
            return Err(TuningError::invalid("world.goal_distance", "must be positive"));
        }
        if world.viewport_height <= 2.0 * world.resource_bounce_inset {
            return Err(TuningError::invalid(
                "world.viewport_height",
                "playable band is empty",
            ));
        }
        if world.cleanup_horizon < 0.0 {
            return Err(TuningError::invalid("world.cleanup_horizon", "must not be negative"));
        }
        if self.player.max_health <= 0.0 {
            return Err(TuningError::invalid("player.max_health", "must be positive"));
        }
        if self.player.speed < 0.0 {
            return Err(TuningError::invalid("player.speed", "must not be negative"));
        }
        if self.ability.cooldown_ms == 0 {
            return Err(TuningError::invalid("ability.cooldown_ms", "must be non-zero"));
        }
        if !(0.0..=1.0).contains(&self.hazards.trap_slow_factor) {
            return Err(TuningError::invalid(
                "hazards.trap_slow_factor",
                "must be within [0, 1]",
            ));
        }
        for (field, rule) in [
            ("spawns.obstacle", &self.spawns.obstacle),
            ("spawns.trap", &self.spawns.trap),
            ("spawns.resource", &self.spawns.resource),
        ] {
            rule.check(field)?;
            if world.viewport_height <= 2.0 * rule.lateral_inset {
                return Err(TuningError::invalid(field, "lateral inset leaves no room"));
            }
        }
        if self.threat.cadence_ms == 0 {
            return Err(TuningError::invalid("threat.cadence_ms", "must be non-zero"));
        }
        if self.threat.detection_range <= self.ability.radius {
            return Err(TuningError::invalid(
                "threat.detection_range",
                "must exceed the ability radius",
            ));
        }
        if self
            .story
            .windows(2)
            .any(|pair| pair[0].distance >= pair[1].distance)
        {
            return Err(TuningError::invalid(
                "story",
                "beat distances must be strictly ascending",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_default_tuning_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "player": { "speed": 300.0 } }"#).unwrap();
        assert_eq!(tuning.player.speed, 300.0);
        assert_eq!(tuning.player.max_health, 100.0);
        assert_eq!(tuning.guardian.max_uses, 2);
        assert_eq!(tuning.story.len(), default_story().len());
    }

    #[test]
    fn test_partial_spawn_rule_keeps_kind_defaults() {
        let tuning = Tuning::from_json(
            r#"{ "spawns": { "trap": { "interval_min_ms": 1000, "interval_max_ms": 1000 } } }"#,
        )
        .unwrap();
        let trap = &tuning.spawns.trap;
        assert_eq!(trap.interval_min_ms, 1000);
        assert_eq!(trap.interval_max_ms, 1000);
        assert_eq!(trap.lead, Span::new(150.0, 500.0));
        assert!(!trap.lead_past_viewport);
        assert_eq!(trap.radius, 40.0);
        assert_eq!(trap.initial_count, 10);
        assert_eq!(trap.initial_x, None);
        // Other kinds untouched
        assert_eq!(tuning.spawns.obstacle.interval_min_ms, 3500);
        assert_eq!(tuning.spawns.resource.initial_x, Some(Span::new(250.0, 1400.0)));
    }

    #[test]
    fn test_explicit_null_clears_initial_band() {
        let tuning =
            Tuning::from_json(r#"{ "spawns": { "obstacle": { "initial_x": null } } }"#).unwrap();
        assert_eq!(tuning.spawns.obstacle.initial_x, None);
        assert_eq!(tuning.spawns.obstacle.initial_count, 30);
    }

    #[test]
    fn test_invalid_slow_factor_rejected() {
        let err = Tuning::from_json(r#"{ "hazards": { "trap_slow_factor": 1.5 } }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "hazards.trap_slow_factor",
                ..
            }
        ));
    }

    #[test]
    fn test_unsorted_story_rejected() {
        let mut tuning = Tuning::default();
        tuning.story.swap(1, 2);
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let json = Tuning::default().to_json().unwrap();
        let tuning = Tuning::from_json(&json).unwrap();
        assert_eq!(tuning.spawns.resource.interval_max_ms, 6000);
    }

    #[test]
    fn test_span_sample_in_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        let span = Span::new(-40.0, -20.0);
        for _ in 0..100 {
            assert!(span.contains(span.sample(&mut rng)));
        }
        assert_eq!(Span::new(3.0, 3.0).sample(&mut rng), 3.0);
    }
}

//! Outbound events
//!
//! The renderer, HUD and end screen only ever see these. They are
//! serializable so a web shell can forward them as JSON.

use serde::Serialize;

use super::narrative::StoryBeat;
use super::outcome::{Outcome, OutcomeSummary};
use super::threat::ThreatSnapshot;

/// Everything the HUD shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSnapshot {
    pub health: f32,
    pub max_health: f32,
    pub distance: u32,
    pub ability_ready: bool,
    pub interventions_left: u32,
    pub antagonist_score: u64,
    pub is_shielded: bool,
    pub is_jammed: bool,
    pub outcome: Outcome,
    /// Line for the message feed
    pub message: Option<String>,
}

/// Screen shake / flash requests for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FeedbackCue {
    ObstacleHit,
    TrapSnag,
    Heal,
    Echolocation,
    GuardianShield,
    Victory,
    Defeat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum GameEvent {
    Snapshot(StateSnapshot),
    /// Echolocation recharge in `[0, 1]`
    CooldownProgress(f32),
    Threat(ThreatSnapshot),
    StoryBeat(StoryBeat),
    Feedback { cue: FeedbackCue, severity: f32 },
    Outcome(OutcomeSummary),
}

impl GameEvent {
    pub fn is_snapshot(&self) -> bool {
        matches!(self, GameEvent::Snapshot(_))
    }
}

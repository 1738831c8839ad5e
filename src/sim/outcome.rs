//! Terminal conditions
//!
//! `Playing -> Won | Lost`. Once terminal, nothing else in the run changes.

use serde::{Deserialize, Serialize};

use super::events::{FeedbackCue, GameEvent};
use super::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Outcome {
    #[default]
    Playing,
    Won,
    Lost,
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Playing)
    }
}

/// End-screen rating of the antagonist's haul
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    Minimal,
    Moderate,
    Severe,
}

impl Impact {
    pub const MODERATE_ABOVE: u64 = 200;
    pub const SEVERE_ABOVE: u64 = 500;

    pub fn from_score(score: u64) -> Self {
        if score > Self::SEVERE_ABOVE {
            Impact::Severe
        } else if score > Self::MODERATE_ABOVE {
            Impact::Moderate
        } else {
            Impact::Minimal
        }
    }
}

/// Emitted exactly once per run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeSummary {
    pub won: bool,
    pub distance: u32,
    pub antagonist_score: u64,
    pub impact: Impact,
}

/// Enter a terminal outcome. Returns false if the run had already ended.
pub fn conclude(state: &mut GameState, outcome: Outcome) -> bool {
    if state.outcome.is_terminal() || !outcome.is_terminal() {
        return false;
    }
    state.outcome = outcome;

    // The only cancellation point: nothing spawns or expires after this
    state.spawner.stop();
    state.timers.clear();

    let won = outcome == Outcome::Won;
    let summary = OutcomeSummary {
        won,
        distance: state.player.distance_traveled(),
        antagonist_score: state.player.antagonist_score,
        impact: Impact::from_score(state.player.antagonist_score),
    };
    log::info!(
        "Run over: {:?} at distance {} (antagonist score {})",
        outcome,
        summary.distance,
        summary.antagonist_score
    );

    if won {
        state.emit(GameEvent::Feedback {
            cue: FeedbackCue::Victory,
            severity: 1.0,
        });
        state.announce("ECHO: I made it... The Sanctuary is real.");
    } else {
        state.emit(GameEvent::Feedback {
            cue: FeedbackCue::Defeat,
            severity: 1.0,
        });
        state.announce("ECHO: The silence... it's everywhere now...");
    }
    state.emit(GameEvent::Outcome(summary));
    true
}

/// Player has touched the sanctuary
pub fn reached_goal(state: &GameState) -> bool {
    state.player.pos.x + state.player.radius >= state.tuning.world.goal_distance
}

/// End-of-tick check for anything collisions did not already conclude
pub fn evaluate(state: &mut GameState) {
    if state.is_over() {
        return;
    }
    if state.player.is_dead() {
        conclude(state, Outcome::Lost);
    } else if reached_goal(state) {
        conclude(state, Outcome::Won);
    }
}

//! Passive hazard sensor
//!
//! Counts traps and obstacles in a wide radius around the player and turns
//! the total into a coarse threat level for the HUD. Runs on its own cadence,
//! not every physics tick.

use glam::Vec2;
use serde::Serialize;

use super::events::GameEvent;
use super::registry::{EntityKind, EntityRegistry};
use super::state::GameState;
use crate::{distance, millis_to_micros};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ThreatLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl ThreatLevel {
    /// Level and advisory text for a hazard count
    pub fn classify(total_hazards: u32) -> (Self, &'static str) {
        if total_hazards >= 12 {
            (
                ThreatLevel::Critical,
                "CRITICAL: Multiple traps ahead - immediate evasion!",
            )
        } else if total_hazards >= 8 {
            (
                ThreatLevel::High,
                "HIGH THREAT: Dense hazard zone detected.",
            )
        } else if total_hazards >= 4 {
            (ThreatLevel::Medium, "CAUTION: Multiple hazards detected ahead.")
        } else if total_hazards >= 2 {
            (ThreatLevel::Low, "Hazards detected nearby.")
        } else {
            (ThreatLevel::Low, "Sensors clear.")
        }
    }
}

/// One sensor reading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreatSnapshot {
    pub level: ThreatLevel,
    pub message: &'static str,
    pub nearby_traps: u32,
    pub nearby_obstacles: u32,
    pub total_hazards: u32,
    /// `None` when nothing is in range
    pub closest_distance: Option<f32>,
}

impl ThreatSnapshot {
    /// Low with fewer than two hazards around
    pub fn is_clear(&self) -> bool {
        self.total_hazards < 2
    }
}

/// Count hazards within `range` of `origin`
pub fn scan(registry: &EntityRegistry, origin: Vec2, range: f32) -> ThreatSnapshot {
    let mut nearby_traps = 0;
    let mut nearby_obstacles = 0;
    let mut closest: Option<f32> = None;

    for hazard in registry
        .query_within_radius(origin, range, None)
        .into_iter()
        .filter(|e| e.kind.is_hazard())
    {
        match hazard.kind {
            EntityKind::Trap => nearby_traps += 1,
            _ => nearby_obstacles += 1,
        }
        let d = distance(hazard.pos, origin);
        closest = Some(closest.map_or(d, |c| c.min(d)));
    }

    let total_hazards = nearby_traps + nearby_obstacles;
    let (level, message) = ThreatLevel::classify(total_hazards);
    ThreatSnapshot {
        level,
        message,
        nearby_traps,
        nearby_obstacles,
        total_hazards,
        closest_distance: closest,
    }
}

/// Cadence bookkeeping and the latest reading
#[derive(Debug, Clone, Default)]
pub struct ThreatAssessment {
    last_scan_us: Option<u64>,
    latest: Option<ThreatSnapshot>,
}

impl ThreatAssessment {
    pub fn is_due(&self, now_us: u64, cadence_ms: u32) -> bool {
        self.last_scan_us
            .is_none_or(|last| now_us.saturating_sub(last) >= millis_to_micros(cadence_ms))
    }

    pub fn latest(&self) -> Option<&ThreatSnapshot> {
        self.latest.as_ref()
    }
}

/// Rescan on cadence; snapshots are emitted only when the HUD sensor is enabled
pub fn run(state: &mut GameState) {
    if state.is_over() {
        return;
    }
    let now = state.clock_us;
    if !state.threat.is_due(now, state.tuning.threat.cadence_ms) {
        return;
    }
    let snapshot = scan(
        &state.registry,
        state.player.pos,
        state.tuning.threat.detection_range,
    );
    log::trace!("Threat scan: {:?} ({} hazards)", snapshot.level, snapshot.total_hazards);
    state.threat.last_scan_us = Some(now);
    state.threat.latest = Some(snapshot.clone());
    if state.threat_detection {
        state.emit(GameEvent::Threat(snapshot));
    }
}

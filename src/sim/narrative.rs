//! Distance-keyed story beats
//!
//! Each beat fires once, the first tick the swimmer's distance reaches its
//! threshold. At most one beat fires per tick, lowest threshold first, so a
//! large jump still plays every crossed beat in order.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Speaker {
    System,
    /// The player character
    Echo,
    /// The guardian drone
    Overseer,
    /// The antagonist corporation
    Apex,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryBeat {
    pub distance: u32,
    pub speaker: Speaker,
    pub text: String,
}

impl StoryBeat {
    pub fn new(distance: u32, speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            distance,
            speaker,
            text: text.into(),
        }
    }
}

/// The shipped beat table, ascending by distance
pub fn default_story() -> Vec<StoryBeat> {
    use Speaker::*;
    [
        (0, System, "Year 2045. The Silent Zone."),
        (100, Echo, "...The water tastes wrong. Everything is murky."),
        (300, Overseer, "Detecting life form. Initiating observation protocol."),
        (600, Echo, "I remember when I could hear my family. Now there is only... noise."),
        (1000, Apex, "Net deployed. Quota progress: 12%."),
        (1200, Overseer, "Warning: Subject entering high-density pollution zone."),
        (1800, Echo, "Is that food? It looks like a jellyfish... but something feels wrong."),
        (2200, Apex, "Waste disposal complete. Cost savings: $500."),
        (2500, Overseer, "Analysis: If subject perishes, ecosystem collapse accelerates by 3.2 years."),
        (3000, Echo, "The Sanctuary... I can almost sense it. The water feels different there."),
        (3500, Apex, "Quarterly report: Profits up 23%. Environmental concerns: Dismissed."),
        (4000, Overseer, "Decision threshold reached. Preparing intervention protocols."),
        (4500, Echo, "The light is getting brighter. I can feel hope again."),
        (5000, Apex, "Warning: Sensor interference detected. Investigating..."),
        (5500, Overseer, "Subject approaching Sanctuary. Probability of survival: Rising."),
    ]
    .into_iter()
    .map(|(distance, speaker, text)| StoryBeat::new(distance, speaker, text))
    .collect()
}

/// Thresholds that have already fired
#[derive(Debug, Clone, Default)]
pub struct NarrativeTrigger {
    triggered: BTreeSet<u32>,
}

impl NarrativeTrigger {
    /// Index of the lowest eligible beat not yet fired; marks it fired
    pub fn check(&mut self, beats: &[StoryBeat], distance: u32) -> Option<usize> {
        let index = beats
            .iter()
            .position(|b| b.distance <= distance && !self.triggered.contains(&b.distance))?;
        self.triggered.insert(beats[index].distance);
        Some(index)
    }

    pub fn has_fired(&self, threshold: u32) -> bool {
        self.triggered.contains(&threshold)
    }

    pub fn fired_count(&self) -> usize {
        self.triggered.len()
    }
}

pub fn run(state: &mut GameState) {
    if state.is_over() {
        return;
    }
    let distance = state.player.distance_traveled();
    if let Some(index) = state.narrative.check(&state.tuning.story, distance) {
        let beat = state.tuning.story[index].clone();
        log::info!("[{:?}] {}", beat.speaker, beat.text);
        state.emit(GameEvent::StoryBeat(beat));
    }
}

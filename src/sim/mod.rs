//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod ability;
pub mod autopilot;
pub mod avoidance;
pub mod collision;
pub mod events;
pub mod guardian;
pub mod narrative;
pub mod outcome;
pub mod registry;
pub mod spawn;
pub mod state;
pub mod threat;
pub mod tick;
pub mod timers;

pub use collision::Contact;
pub use events::{FeedbackCue, GameEvent, StateSnapshot};
pub use guardian::GuardianPhase;
pub use narrative::{Speaker, StoryBeat};
pub use outcome::{Impact, Outcome, OutcomeSummary};
pub use registry::{Entity, EntityId, EntityKind, EntityRegistry};
pub use state::{GameState, Player};
pub use threat::{ThreatLevel, ThreatSnapshot};
pub use tick::{TickInput, tick};
pub use timers::{Effect, TimerQueue};

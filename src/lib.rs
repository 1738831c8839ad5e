//! Abyss Equilibrium - side-scrolling ocean survival simulation core
//!
//! Core modules:
//! - `sim`: Simulation (entities, spawning, collisions, guardian, threat, story)
//! - `tuning`: Data-driven game balance
//! - `settings`: Scene-start options
//! - `error`: Configuration errors
//!
//! Rendering, audio and menus live outside this crate. They feed
//! [`sim::TickInput`] in and drain [`sim::GameEvent`]s out.

pub mod error;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::TuningError;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Player collision radius (world units)
    pub const PLAYER_RADIUS: f32 = 24.0;
    /// Player spawn position
    pub const PLAYER_START_X: f32 = 150.0;

    /// Extra world width past the goal the player may swim into
    pub const WORLD_OVERRUN: f32 = 500.0;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// True if two circles overlap (touching counts as overlap)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    (a - b).length_squared() <= r * r
}

/// Convert seconds to whole microseconds on the simulation clock
#[inline]
pub fn secs_to_micros(secs: f32) -> u64 {
    (f64::from(secs.max(0.0)) * 1_000_000.0).round() as u64
}

/// Convert milliseconds to microseconds on the simulation clock
#[inline]
pub fn millis_to_micros(ms: u32) -> u64 {
    u64::from(ms) * 1_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 10.0, Vec2::new(15.0, 0.0), 5.0));
        assert!(!circles_overlap(Vec2::ZERO, 10.0, Vec2::new(15.1, 0.0), 5.0));
    }

    #[test]
    fn test_time_conversion() {
        assert_eq!(secs_to_micros(1.0), 1_000_000);
        assert_eq!(secs_to_micros(-1.0), 0);
        assert_eq!(millis_to_micros(3500), 3_500_000);
    }
}

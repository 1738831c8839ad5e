//! Scene-start options
//!
//! Supplied once by the menu shell when a run begins. Unlike [`crate::Tuning`]
//! these are player preferences, not game balance.

use serde::{Deserialize, Serialize};

/// Options fixed for the lifetime of one run
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Emit threat snapshots for the HUD sensor panel
    pub threat_detection: bool,
    /// RNG seed; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Settings {
    pub fn with_threat_detection(mut self, enabled: bool) -> Self {
        self.threat_detection = enabled;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Seed to start the run with
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(!settings.threat_detection);
        assert!(settings.seed.is_none());
    }

    #[test]
    fn test_explicit_seed_is_used() {
        let settings = Settings::default().with_seed(42).with_threat_detection(true);
        assert_eq!(settings.resolve_seed(), 42);
        assert!(settings.threat_detection);
    }

    #[test]
    fn test_from_json() {
        let settings: Settings = serde_json::from_str(r#"{ "threat_detection": true }"#).unwrap();
        assert!(settings.threat_detection);
        assert_eq!(settings.seed, None);
    }
}

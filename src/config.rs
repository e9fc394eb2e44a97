use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::components::Bounds;

/// Simulation tunables that differ between profiles or depend on the
/// display. Fixed behavior constants live next to the code that uses them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Short intervals for watching the pet develop quickly.
    pub debug: bool,
    /// Roaming area in pixels.
    pub screen: Bounds,
    /// Pet sprite size in pixels.
    pub sprite_size: Vec2,
    /// Mean seconds between poop spawn rolls.
    pub poop_interval_secs: f32,
    /// Chance a spawn roll drops a poop.
    pub poop_chance: f32,
    /// Time away (hours) after which a poop is waiting on return.
    pub time_away_poop_hours: f64,
    /// Seconds the cursor must stay within attack range before pouncing.
    pub attack_hold_secs: f32,
    /// Garbage receptacle position, relative to the bottom-right corner.
    pub garbage_offset: Vec2,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl SimConfig {
    pub fn production() -> Self {
        Self {
            debug: false,
            screen: Bounds::new(1920.0, 1080.0),
            sprite_size: Vec2::new(64.0, 64.0),
            poop_interval_secs: 3600.0,
            poop_chance: 0.5,
            time_away_poop_hours: 3.0,
            attack_hold_secs: 0.0,
            garbage_offset: Vec2::new(-240.0, -90.0),
        }
    }

    pub fn debug() -> Self {
        Self {
            debug: true,
            poop_interval_secs: 60.0,
            time_away_poop_hours: 180.0 / 3600.0,
            ..Self::production()
        }
    }

    /// Garbage receptacle in screen coordinates for the given bounds.
    pub fn garbage_position(&self, bounds: Bounds) -> Vec2 {
        Vec2::new(bounds.width, bounds.height) + self.garbage_offset
    }

    pub fn label(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "production"
        }
    }
}

/// Read a config override file. Missing or malformed files yield `None`.
pub fn load_config(path: &Path) -> Option<SimConfig> {
    let text = fs::read_to_string(path).ok()?;
    match serde_json::from_str::<SimConfig>(&text) {
        Ok(config) => {
            log::info!("Loaded {} config from {}", config.label(), path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("Ignoring malformed config {}: {e}", path.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_shortens_intervals() {
        let prod = SimConfig::production();
        let dbg = SimConfig::debug();
        assert!(dbg.poop_interval_secs < prod.poop_interval_secs);
        assert!(dbg.time_away_poop_hours < prod.time_away_poop_hours);
        assert_eq!(dbg.screen, prod.screen);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: SimConfig =
            serde_json::from_str(r#"{ "poop_interval_secs": 120.0 }"#).unwrap();
        assert_eq!(config.poop_interval_secs, 120.0);
        assert_eq!(config.poop_chance, 0.5);
        assert!(!config.debug);
    }

    #[test]
    fn garbage_inside_house_zone() {
        let config = SimConfig::production();
        let garbage = config.garbage_position(config.screen);
        assert!(config.screen.house_zone().contains(garbage));
    }

    #[test]
    fn missing_file_is_none() {
        assert!(load_config(Path::new("/nonexistent/deskpet/config.json")).is_none());
    }
}

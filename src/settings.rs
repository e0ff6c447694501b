//! Game settings and preferences
//!
//! Tunables for a run of the headless demo, persisted as JSON next to the
//! binary. Anything missing or malformed falls back to defaults; settings
//! can never stop the game from starting.

use serde::{Deserialize, Serialize};

use crate::consts::SLIDE_SPEED;
use crate::sim::PilotConfig;

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Slide speed override, world units per frame.
    pub slide_speed: f32,
    /// Seed for the demo pilot's RNG.
    pub demo_seed: u64,
    /// Demo pilot tuning.
    pub pilot: PilotConfig,
    /// Hard cap on demo frames, in case the pilot never blunders.
    pub max_demo_frames: u64,
    /// Extra frames to keep ticking after the run ends, so the collapse
    /// plays out.
    pub ending_frames: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            slide_speed: SLIDE_SPEED,
            demo_seed: 2026,
            pilot: PilotConfig::default(),
            max_demo_frames: 60 * 60 * 5,
            ending_frames: 120,
        }
    }
}

impl Settings {
    /// Settings file, looked up in the working directory.
    const FILE: &'static str = "stack_tower_settings.json";

    /// Load settings from disk, falling back to defaults on any failure.
    pub fn load() -> Self {
        match std::fs::read_to_string(Self::FILE) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("loaded settings from {}", Self::FILE);
                    settings
                }
                Err(err) => {
                    log::warn!("ignoring malformed {}: {err}", Self::FILE);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no {} found, using defaults", Self::FILE);
                Self::default()
            }
        }
    }

    /// Write settings to disk. Failures are logged, never fatal.
    pub fn save(&self) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(err) = std::fs::write(Self::FILE, json) {
                    log::warn!("could not save {}: {err}", Self::FILE);
                }
            }
            Err(err) => log::warn!("could not serialize settings: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip() {
        let settings = Settings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.slide_speed, settings.slide_speed);
        assert_eq!(back.demo_seed, settings.demo_seed);
        assert_eq!(back.max_demo_frames, settings.max_demo_frames);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"demo_seed": 7}"#).unwrap();
        assert_eq!(settings.demo_seed, 7);
        assert_eq!(settings.slide_speed, SLIDE_SPEED);
        assert_eq!(settings.ending_frames, Settings::default().ending_frames);
    }
}

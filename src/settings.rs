//! Game settings and preferences
//!
//! Read from a JSON file on native builds; missing or malformed files fall back
//! to defaults with a warning.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::sim::SessionConfig;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Viewport ===
    pub width: f32,
    pub height: f32,

    // === Run ===
    /// Fixed RNG seed; `None` picks one from the clock
    pub seed: Option<u64>,

    // === Audio ===
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (no milestone score flash)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
            seed: None,
            sfx_volume: 0.2,
            muted: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not read {}: {} - using defaults", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings in {}: {} - using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Effective sfx volume (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.sfx_volume.clamp(0.0, 1.0)
        }
    }

    /// Session parameters; `fallback_seed` is used when no seed is configured
    pub fn session_config(&self, fallback_seed: u64) -> SessionConfig {
        SessionConfig {
            milestone_flash: !self.reduced_motion,
            ..SessionConfig::new(self.width, self.height, self.seed.unwrap_or(fallback_seed))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 42, "muted": true }"#).unwrap();
        assert_eq!(settings.seed, Some(42));
        assert!(settings.muted);
        assert_eq!(settings.width, VIEWPORT_WIDTH);
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            width: 800.0,
            reduced_motion: true,
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(Settings::from_json("{ width: }").is_err());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load(Path::new("/nonexistent/dino-run.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_session_config() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        let config = settings.session_config(77);
        assert_eq!(config.seed, 77);
        assert!(!config.milestone_flash);
        assert_eq!(config.viewport.y, VIEWPORT_HEIGHT);

        let seeded = Settings {
            seed: Some(5),
            ..Default::default()
        };
        assert_eq!(seeded.session_config(77).seed, 5);
    }
}

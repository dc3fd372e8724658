//! User settings
//!
//! A small RON file next to the binary: volumes, overlay toggles and the
//! leaderboard name. Reading is defensive: a missing, unparsable or
//! out-of-range file falls back to defaults with a warning, never a crash.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings file name, looked up in the working directory
pub const SETTINGS_FILE: &str = "grotto.ron";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("serialize error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("validation error: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Overall gain applied on top of the sfx/music gains
    pub master_volume: f32,
    pub music_volume: f32,
    pub sfx_volume: f32,
    /// Draw the frame-rate readout in the corner
    pub show_fps: bool,
    /// Name submitted with leaderboard scores
    pub player_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.7,
            music_volume: 0.5,
            sfx_volume: 0.8,
            show_fps: false,
            player_name: "Digger".to_string(),
        }
    }
}

impl Settings {
    /// Effective per-effect playback volume
    pub fn effective_sfx(&self) -> f32 {
        (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
    }

    /// Effective music playback volume
    pub fn effective_music(&self) -> f32 {
        (self.master_volume * self.music_volume).clamp(0.0, 1.0)
    }

    fn validate(self) -> Result<Self, SettingsError> {
        for (name, value) in [
            ("master_volume", self.master_volume),
            ("music_volume", self.music_volume),
            ("sfx_volume", self.sfx_volume),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(SettingsError::Invalid(format!(
                    "{name} out of range: {value}"
                )));
            }
        }
        if self.player_name.len() > 32 {
            return Err(SettingsError::Invalid("player_name too long".into()));
        }
        Ok(self)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &str) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        let settings: Settings = ron::from_str(&text)?;
        settings.validate()
    }

    /// Load from disk, falling back to defaults on any problem.
    /// The browser build has no filesystem and always gets defaults.
    pub fn load_or_default(path: &str) -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        {
            if std::path::Path::new(path).exists() {
                match Self::load(path) {
                    Ok(settings) => return settings,
                    Err(err) => {
                        tracing::warn!(path, %err, "unreadable settings, using defaults")
                    }
                }
            }
        }
        let _ = path;
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self, path: &str) -> Result<(), SettingsError> {
        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_file_missing() {
        let settings = Settings::load_or_default("does-not-exist.ron");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_validation_rejects_bad_volume() {
        let settings = Settings {
            master_volume: 1.5,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_round_trip() {
        let settings = Settings {
            show_fps: true,
            player_name: "Topo".into(),
            ..Default::default()
        };
        let text = ron::ser::to_string_pretty(&settings, Default::default()).unwrap();
        let back: Settings = ron::from_str(&text).unwrap();
        assert_eq!(settings, back);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let back: Settings = ron::from_str("(show_fps: true)").unwrap();
        assert!(back.show_fps);
        assert_eq!(back.master_volume, Settings::default().master_volume);
    }
}

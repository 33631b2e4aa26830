//! Player preferences
//!
//! Persisted in LocalStorage on the web. Holds no gameplay progress.

use serde::{Deserialize, Serialize};

use crate::sim::Falloff;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 128,
            QualityPreset::Medium => 512,
            QualityPreset::High => 2048,
        }
    }

    /// Circle tessellation for discs and rings
    pub fn circle_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 16,
            QualityPreset::Medium => 32,
            QualityPreset::High => 48,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Particle effects (pull sparks, goal confetti)
    pub particles: bool,
    /// Background field-line waves
    pub waves: bool,

    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    /// Force drop-off curve used by the magnet
    pub falloff: Falloff,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            waves: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            falloff: Falloff::Linear,
        }
    }
}

impl Settings {
    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Effective sound effect volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Change one option from a UI control (`name` is the control id)
    ///
    /// Returns false for unknown options or unparseable values, leaving
    /// the settings untouched.
    pub fn set_option(&mut self, name: &str, value: &str) -> bool {
        match name {
            "quality" => match QualityPreset::from_str(value) {
                Some(quality) => self.quality = quality,
                None => return false,
            },
            "falloff" => match Falloff::from_str(value) {
                Some(falloff) => self.falloff = falloff,
                None => return false,
            },
            "sound" => match parse_switch(value) {
                Some(on) => self.muted = !on,
                None => return false,
            },
            "particles" => match parse_switch(value) {
                Some(on) => self.particles = on,
                None => return false,
            },
            "waves" => match parse_switch(value) {
                Some(on) => self.waves = on,
                None => return false,
            },
            _ => return false,
        }
        log::debug!("Setting {} = {}", name, value);
        true
    }

    /// Current value of an option, in the form `set_option` accepts
    pub fn option_value(&self, name: &str) -> Option<String> {
        let switch = |on: bool| String::from(if on { "on" } else { "off" });
        match name {
            "quality" => Some(self.quality.as_str().to_string()),
            "falloff" => Some(self.falloff.as_str().to_string()),
            "sound" => Some(switch(!self.muted)),
            "particles" => Some(switch(self.particles)),
            "waves" => Some(switch(self.waves)),
            _ => None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "magnet_quest_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "1" => Some(true),
        "off" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// Option names exposed as page controls
pub const OPTION_NAMES: [&str; 5] = ["quality", "falloff", "sound", "particles", "waves"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particles_off_means_zero_cap() {
        let settings = Settings {
            particles: false,
            ..Default::default()
        };
        assert_eq!(settings.max_particles(), 0);
        assert_eq!(Settings::default().max_particles(), 512);
    }

    #[test]
    fn test_muted_volume() {
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        assert_eq!(settings.effective_volume(), 0.0);
        assert!((Settings::default().effective_volume() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"quality":"High","falloff":"Power"}"#).unwrap();
        assert_eq!(settings.quality, QualityPreset::High);
        assert_eq!(settings.falloff, Falloff::Power);
        assert!(settings.particles);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Settings::from_json("{not json").is_err());
    }

    #[test]
    fn test_set_option_updates_fields() {
        let mut settings = Settings::default();
        assert!(settings.set_option("sound", "off"));
        assert!(settings.muted);
        assert_eq!(settings.effective_volume(), 0.0);

        assert!(settings.set_option("quality", "high"));
        assert_eq!(settings.max_particles(), 2048);

        assert!(settings.set_option("falloff", "power"));
        assert_eq!(settings.falloff, Falloff::Power);

        assert!(settings.set_option("particles", "false"));
        assert_eq!(settings.max_particles(), 0);
    }

    #[test]
    fn test_set_option_rejects_bad_input() {
        let mut settings = Settings::default();
        assert!(!settings.set_option("quality", "ultra"));
        assert!(!settings.set_option("gravity", "on"));
        assert!(!settings.set_option("waves", "maybe"));
        assert_eq!(settings.quality, QualityPreset::Medium);
        assert!(settings.waves);
    }

    #[test]
    fn test_option_values_feed_back_into_set_option() {
        let mut source = Settings::default();
        source.set_option("quality", "low");
        source.set_option("sound", "off");
        let mut copy = Settings::default();
        for name in OPTION_NAMES {
            let value = source.option_value(name).unwrap();
            assert!(copy.set_option(name, &value), "{name}={value}");
        }
        assert_eq!(copy.to_json().unwrap(), source.to_json().unwrap());
    }

    #[test]
    fn test_changed_settings_survive_json() {
        let mut settings = Settings::default();
        settings.set_option("falloff", "power");
        settings.set_option("sound", "off");
        let loaded = Settings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(loaded.falloff, Falloff::Power);
        assert!(loaded.muted);
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!(QualityPreset::from_str("LOW"), Some(QualityPreset::Low));
        assert_eq!(QualityPreset::from_str("ultra"), None);
    }
}

//! Game settings and preferences
//!
//! Persisted separately from progress in key/value storage.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_STARTING_LIVES, FIRE_COOLDOWN_MS};
use crate::platform::KeyValueStore;
use crate::retry::RetryPolicy;
use crate::wallet::ChainConfig;

/// Column-count formula used by the wave generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ColumnPolicy {
    /// 12 + min(w - 1, 4): one extra column per wave, 16 max
    #[default]
    Linear,
    /// 8 + min(floor((w - 1) / 2), 4): one extra column every other wave, 12 max
    Stepped,
}

impl ColumnPolicy {
    pub fn columns(&self, wave_number: u32) -> u32 {
        let w = wave_number.max(1);
        match self {
            ColumnPolicy::Linear => 12 + (w - 1).min(4),
            ColumnPolicy::Stepped => 8 + ((w - 1) / 2).min(4),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnPolicy::Linear => "Linear",
            ColumnPolicy::Stepped => "Stepped",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "linear" => Some(ColumnPolicy::Linear),
            "stepped" => Some(ColumnPolicy::Stepped),
            _ => None,
        }
    }
}

/// What happens when an enemy breaches the defense line and lives remain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LifeLossPolicy {
    /// Stop the loop, show a prompt, restart the same wave on acknowledgment
    #[default]
    PauseAndPrompt,
    /// Keep playing the current wave without interruption
    ContinueImmediately,
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Toggled with M
    pub muted: bool,

    // === Gameplay ===
    pub column_policy: ColumnPolicy,
    pub life_loss_policy: LifeLossPolicy,
    /// Lives granted when none are stored yet
    pub starting_lives: u32,
    /// Auto-fire interval while fire is held (ms)
    pub fire_cooldown_ms: f64,

    // === Services ===
    /// Base URL of the score API (`/api` when served alongside the game)
    pub api_base: String,
    pub submit_retry: RetryPolicy,
    pub chain: ChainConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 0.15,
            muted: false,

            column_policy: ColumnPolicy::Linear,
            life_loss_policy: LifeLossPolicy::PauseAndPrompt,
            starting_lives: DEFAULT_STARTING_LIVES,
            fire_cooldown_ms: FIRE_COOLDOWN_MS,

            api_base: "/api".to_string(),
            submit_retry: RetryPolicy::default(),
            chain: ChainConfig::default(),
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "settings";

    /// Effective sound effect volume (0 when muted)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        log::info!("Audio {}", if self.muted { "muted" } else { "unmuted" });
    }

    /// Load settings, falling back to defaults on missing or corrupt data
    pub fn load(store: &impl KeyValueStore) -> Self {
        if let Some(json) = store.get(Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from storage");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring corrupt settings: {e}"),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self, store: &mut impl KeyValueStore) {
        if let Ok(json) = serde_json::to_string(self) {
            if store.set(Self::STORAGE_KEY, &json) {
                log::info!("Settings saved");
            } else {
                log::warn!("Settings could not be saved");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;

    #[test]
    fn test_column_policies() {
        assert_eq!(ColumnPolicy::Linear.columns(1), 12);
        assert_eq!(ColumnPolicy::Linear.columns(2), 13);
        assert_eq!(ColumnPolicy::Linear.columns(5), 16);
        assert_eq!(ColumnPolicy::Linear.columns(40), 16);

        assert_eq!(ColumnPolicy::Stepped.columns(1), 8);
        assert_eq!(ColumnPolicy::Stepped.columns(3), 9);
        assert_eq!(ColumnPolicy::Stepped.columns(9), 12);
        assert_eq!(ColumnPolicy::Stepped.columns(40), 12);
    }

    #[test]
    fn test_mute_silences_effects() {
        let mut settings = Settings::default();
        assert!(settings.effective_sfx_volume() > 0.0);
        settings.toggle_mute();
        assert_eq!(settings.effective_sfx_volume(), 0.0);
    }

    #[test]
    fn test_settings_persist() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::default();
        settings.column_policy = ColumnPolicy::Stepped;
        settings.life_loss_policy = LifeLossPolicy::ContinueImmediately;
        settings.save(&mut store);

        let loaded = Settings::load(&store);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_corrupt_settings_fall_back() {
        let mut store = MemoryStore::new();
        store.set("settings", "{not json");
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let mut store = MemoryStore::new();
        store.set("settings", r#"{"muted":true}"#);
        let loaded = Settings::load(&store);
        assert!(loaded.muted);
        assert_eq!(loaded.starting_lives, DEFAULT_STARTING_LIVES);
    }
}

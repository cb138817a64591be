//! Game settings and preferences
//!
//! Persisted separately from high scores (LocalStorage on web, a JSON file
//! on native).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest selectable base difficulty step
pub const MIN_BASE_STEP: u8 = 1;
/// Highest selectable base difficulty step
pub const MAX_BASE_STEP: u8 = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("base difficulty must be between 1 and 3 (got {step})")]
    BaseDifficultyOutOfRange { step: u8 },
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Starting difficulty step, always in {1, 2, 3}
    base_difficulty: u8,
    /// Sound effects toggle (read by the UI shell)
    pub sound_effects: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_difficulty: MIN_BASE_STEP,
            sound_effects: true,
        }
    }
}

impl Settings {
    pub fn base_difficulty(&self) -> u8 {
        // A hand-edited file may carry anything
        self.base_difficulty.clamp(MIN_BASE_STEP, MAX_BASE_STEP)
    }

    /// Base difficulty as the real value a session starts from
    pub fn base_difficulty_value(&self) -> f64 {
        f64::from(self.base_difficulty())
    }

    pub fn set_base_difficulty(&mut self, step: u8) -> Result<(), SettingsError> {
        if !(MIN_BASE_STEP..=MAX_BASE_STEP).contains(&step) {
            return Err(SettingsError::BaseDifficultyOutOfRange { step });
        }
        self.base_difficulty = step;
        Ok(())
    }

    /// Stepper "+" (saturates at the top step)
    pub fn step_up(&mut self) {
        self.base_difficulty = (self.base_difficulty() + 1).min(MAX_BASE_STEP);
    }

    /// Stepper "-" (saturates at the bottom step)
    pub fn step_down(&mut self) {
        self.base_difficulty = self.base_difficulty().saturating_sub(1).max(MIN_BASE_STEP);
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "dino_cretaceous_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
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
            match serde_json::to_string(self) {
                Ok(json) => {
                    if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                        log::warn!("Failed to write settings to LocalStorage");
                    } else {
                        log::info!("Settings saved");
                    }
                }
                Err(e) => log::warn!("Failed to encode settings: {e}"),
            }
        }
    }

    /// Load settings from a JSON file, defaults when missing or corrupt
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        crate::persistence::load_or_default(path)
    }

    /// Save settings to a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), crate::persistence::PersistenceError> {
        crate::persistence::save_json(path, self)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.base_difficulty(), 1);
        assert_eq!(settings.base_difficulty_value(), 1.0);
        assert!(settings.sound_effects);
    }

    #[test]
    fn test_set_base_difficulty_rejects_out_of_range() {
        let mut settings = Settings::default();
        assert_eq!(settings.set_base_difficulty(2), Ok(()));
        assert_eq!(settings.base_difficulty(), 2);
        assert_eq!(
            settings.set_base_difficulty(4),
            Err(SettingsError::BaseDifficultyOutOfRange { step: 4 })
        );
        assert_eq!(
            settings.set_base_difficulty(0),
            Err(SettingsError::BaseDifficultyOutOfRange { step: 0 })
        );
        assert_eq!(settings.base_difficulty(), 2);
    }

    #[test]
    fn test_stepper_saturates() {
        let mut settings = Settings::default();
        settings.step_down();
        assert_eq!(settings.base_difficulty(), 1);
        settings.step_up();
        settings.step_up();
        settings.step_up();
        assert_eq!(settings.base_difficulty(), 3);
        settings.step_down();
        assert_eq!(settings.base_difficulty(), 2);
    }

    #[test]
    fn test_hand_edited_value_is_clamped() {
        let settings: Settings =
            serde_json::from_str(r#"{"base_difficulty": 9}"#).expect("valid json");
        assert_eq!(settings.base_difficulty(), 3);
        assert!(settings.sound_effects);
    }
}

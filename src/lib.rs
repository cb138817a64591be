//! Dino Cretaceous - jump over hazards, collect orbs
//!
//! Core modules:
//! - `difficulty`: Adaptive difficulty (rule-based heuristic + tiny trained predictors)
//! - `sim`: Deterministic session simulation (counters, spawns, contact handling)
//! - `game`: Host that owns a session, a trained predictor and the score store
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences (base difficulty)
//! - `highscores`: Ranked session history
//! - `persistence`: JSON file storage (native)
//! - `platform`: Browser/native platform abstraction

pub mod difficulty;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use difficulty::{DifficultyPredictor, FeatureVector, SessionSnapshot};
pub use game::Game;
pub use highscores::HighScores;
pub use settings::Settings;
pub use tuning::{DifficultyMode, Tuning};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f64 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Difficulty bounds (base and current)
    pub const MIN_DIFFICULTY: f64 = 1.0;
    pub const MAX_DIFFICULTY: f64 = 3.0;
}

/// Clamp a difficulty value into [MIN_DIFFICULTY, MAX_DIFFICULTY].
///
/// Non-finite input maps to the minimum.
#[inline]
pub fn clamp_difficulty(value: f64) -> f64 {
    use consts::{MAX_DIFFICULTY, MIN_DIFFICULTY};
    if value.is_nan() {
        return MIN_DIFFICULTY;
    }
    value.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_difficulty() {
        assert_eq!(clamp_difficulty(0.2), 1.0);
        assert_eq!(clamp_difficulty(2.25), 2.25);
        assert_eq!(clamp_difficulty(7.0), 3.0);
        assert_eq!(clamp_difficulty(f64::NAN), 1.0);
        assert_eq!(clamp_difficulty(f64::INFINITY), 3.0);
        assert_eq!(clamp_difficulty(f64::NEG_INFINITY), 1.0);
    }
}

//! Data-driven game balance
//!
//! Every field has a default, so a tuning file only needs the values it
//! overrides.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which estimate drives the live difficulty after an orb pickup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyMode {
    /// Rule-based heuristic only
    #[default]
    RuleBased,
    /// 60/40 blend of heuristic and trained predictors
    Hybrid,
}

/// Errors raised when tuning invariants are violated
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("{field} must be positive (got {value:.2})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must be finite (got {value})")]
    NotFinite { field: &'static str, value: f32 },
    #[error("starting lives must be at least 1")]
    NoLives,
    #[error("orb height band invalid (min {min:.1}, max {max:.1})")]
    OrbBand { min: f32, max: f32 },
    #[error("invalid tuning json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub orb_spawn_interval_secs: f64,
    pub hazard_spawn_interval_secs: f64,
    /// Crossing time at speed 1.0
    pub orb_travel_secs: f64,
    pub hazard_travel_secs: f64,
    pub points_per_orb: u64,
    pub starting_lives: u8,
    /// A player sample below this y counts as a hazard hit
    pub fall_threshold_y: f32,
    pub field_width: f32,
    pub orb_height_min: f32,
    pub orb_height_max: f32,
    pub hazard_lane_y: f32,
    pub difficulty_mode: DifficultyMode,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            orb_spawn_interval_secs: 2.0,
            hazard_spawn_interval_secs: 3.0,
            orb_travel_secs: 6.0,
            hazard_travel_secs: 4.0,
            points_per_orb: 10,
            starting_lives: 3,
            fall_threshold_y: -200.0,
            field_width: 750.0,
            orb_height_min: 200.0,
            orb_height_max: 650.0,
            hazard_lane_y: 120.0,
            difficulty_mode: DifficultyMode::RuleBased,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("orb_spawn_interval_secs", self.orb_spawn_interval_secs),
            ("hazard_spawn_interval_secs", self.hazard_spawn_interval_secs),
            ("orb_travel_secs", self.orb_travel_secs),
            ("hazard_travel_secs", self.hazard_travel_secs),
            ("field_width", f64::from(self.field_width)),
        ];
        for (field, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(TuningError::NotPositive { field, value });
            }
        }
        let finite = [
            ("fall_threshold_y", self.fall_threshold_y),
            ("orb_height_min", self.orb_height_min),
            ("orb_height_max", self.orb_height_max),
            ("hazard_lane_y", self.hazard_lane_y),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(TuningError::NotFinite { field, value });
            }
        }
        if self.starting_lives == 0 {
            return Err(TuningError::NoLives);
        }
        if self.orb_height_min > self.orb_height_max {
            return Err(TuningError::OrbBand {
                min: self.orb_height_min,
                max: self.orb_height_max,
            });
        }
        Ok(())
    }
}

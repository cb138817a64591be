//! Session inputs and the feature vector fed to both predictors

use serde::{Deserialize, Serialize};

use crate::clamp_difficulty;

/// Number of features in a `FeatureVector`
pub const FEATURE_COUNT: usize = 6;

/// What the predictor sees of a session at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub score: u64,
    pub lives: u8,
    pub orbs_collected: u32,
    pub hazard_hits: u32,
    /// Seconds since session start
    pub elapsed_secs: f64,
    pub base_difficulty: f64,
}

impl SessionSnapshot {
    /// Elapsed time with negative/non-finite values clamped to 0
    pub fn sanitized_elapsed(&self) -> f64 {
        if self.elapsed_secs.is_finite() {
            self.elapsed_secs.max(0.0)
        } else {
            0.0
        }
    }

    /// Base difficulty clamped into [1, 3]
    pub fn sanitized_base(&self) -> f64 {
        clamp_difficulty(self.base_difficulty)
    }

    /// Build the ordered feature tuple
    pub fn features(&self) -> FeatureVector {
        FeatureVector {
            score: self.score as f64,
            lives: f64::from(self.lives),
            orbs_collected: f64::from(self.orbs_collected),
            hazard_hits: f64::from(self.hazard_hits),
            elapsed_secs: self.sanitized_elapsed(),
            base_difficulty: self.sanitized_base(),
        }
    }
}

/// `(score, lives, orbsCollected, hazardHits, elapsedTimeSeconds, baseDifficulty)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub score: f64,
    pub lives: f64,
    pub orbs_collected: f64,
    pub hazard_hits: f64,
    pub elapsed_secs: f64,
    pub base_difficulty: f64,
}

impl FeatureVector {
    pub const fn new(
        score: f64,
        lives: f64,
        orbs_collected: f64,
        hazard_hits: f64,
        elapsed_secs: f64,
        base_difficulty: f64,
    ) -> Self {
        Self {
            score,
            lives,
            orbs_collected,
            hazard_hits,
            elapsed_secs,
            base_difficulty,
        }
    }

    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.score,
            self.lives,
            self.orbs_collected,
            self.hazard_hits,
            self.elapsed_secs,
            self.base_difficulty,
        ]
    }
}

/// One row of a training corpus
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub features: FeatureVector,
    pub target: f64,
}

impl TrainingSample {
    pub const fn new(features: FeatureVector, target: f64) -> Self {
        Self { features, target }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(elapsed_secs: f64, base_difficulty: f64) -> SessionSnapshot {
        SessionSnapshot {
            score: 120,
            lives: 3,
            orbs_collected: 8,
            hazard_hits: 0,
            elapsed_secs,
            base_difficulty,
        }
    }

    #[test]
    fn test_feature_order() {
        let f = snapshot(45.0, 1.5).features();
        assert_eq!(f.to_array(), [120.0, 3.0, 8.0, 0.0, 45.0, 1.5]);
    }

    #[test]
    fn test_malformed_elapsed_is_clamped() {
        assert_eq!(snapshot(-5.0, 1.0).features().elapsed_secs, 0.0);
        assert_eq!(snapshot(f64::NAN, 1.0).features().elapsed_secs, 0.0);
        assert_eq!(snapshot(f64::INFINITY, 1.0).features().elapsed_secs, 0.0);
    }

    #[test]
    fn test_malformed_base_is_clamped() {
        assert_eq!(snapshot(1.0, 0.0).features().base_difficulty, 1.0);
        assert_eq!(snapshot(1.0, 9.0).features().base_difficulty, 3.0);
    }
}

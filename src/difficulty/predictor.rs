//! Difficulty predictor: rule-based heuristic, ML ensemble and the hybrid blend

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::features::{FEATURE_COUNT, FeatureVector, SessionSnapshot, TrainingSample};
use super::linear::LinearRegressor;
use super::network::{DEFAULT_EPOCHS, ShallowNetwork};
use crate::clamp_difficulty;

/// Hand-authored corpus spanning low/medium/high performance
pub const TRAINING_CORPUS: [TrainingSample; 6] = [
    // Low performance
    TrainingSample::new(FeatureVector::new(50.0, 3.0, 2.0, 1.0, 30.0, 1.0), 1.2),
    // Good
    TrainingSample::new(FeatureVector::new(120.0, 3.0, 8.0, 0.0, 45.0, 1.5), 2.1),
    // Struggling
    TrainingSample::new(FeatureVector::new(80.0, 2.0, 4.0, 3.0, 60.0, 2.0), 1.5),
    // Excellent
    TrainingSample::new(FeatureVector::new(200.0, 3.0, 12.0, 1.0, 90.0, 2.5), 2.8),
    // Very struggling
    TrainingSample::new(FeatureVector::new(30.0, 1.0, 1.0, 5.0, 25.0, 1.0), 1.0),
    // Good
    TrainingSample::new(FeatureVector::new(150.0, 3.0, 10.0, 0.0, 75.0, 2.0), 2.3),
];

/// Hybrid blend weights
pub const HYBRID_RULE_WEIGHT: f64 = 0.6;
pub const HYBRID_ML_WEIGHT: f64 = 0.4;

/// Owns both predictors and their trained state.
///
/// Construct once per game and pass it by reference into each inference;
/// training happens at most once unless `train_models` is called again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyPredictor {
    linear: LinearRegressor,
    network: Option<ShallowNetwork>,
    trained: bool,
}

impl DifficultyPredictor {
    /// Untrained predictor whose network init is driven by `seed`
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        Self::with_network(Some(ShallowNetwork::new(FEATURE_COUNT, &mut rng)))
    }

    /// Untrained predictor seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Seeded predictor with `train_models` already run
    pub fn trained(seed: u64) -> Self {
        let mut predictor = Self::new(seed);
        predictor.train_models();
        predictor
    }

    /// Predictor with an explicit (possibly absent) network
    pub fn with_network(network: Option<ShallowNetwork>) -> Self {
        Self {
            linear: LinearRegressor::new(),
            network,
            trained: false,
        }
    }

    pub fn is_trained(&self) -> bool {
        self.trained
    }

    /// Fit both models on `TRAINING_CORPUS`, linear first then network.
    ///
    /// Repeat calls retrain: the linear model restarts from zero, the
    /// network continues from its current weights.
    pub fn train_models(&mut self) {
        self.linear.train(&TRAINING_CORPUS);
        if let Some(network) = self.network.as_mut() {
            network.train(&TRAINING_CORPUS, DEFAULT_EPOCHS);
        }
        self.trained = true;
        log::debug!("Difficulty models trained on {} samples", TRAINING_CORPUS.len());
    }

    /// Rule-based estimate; needs no training
    pub fn predict_difficulty(snapshot: &SessionSnapshot) -> f64 {
        let elapsed = snapshot.sanitized_elapsed();
        let mut difficulty = snapshot.sanitized_base();

        // Doing well
        if snapshot.score > 100 && snapshot.hazard_hits == 0 && snapshot.orbs_collected > 5 {
            difficulty += 0.5;
        }
        // Struggling
        if snapshot.hazard_hits >= 3 && snapshot.score < 80 {
            difficulty -= 0.5;
        }
        // Long, strong session
        if elapsed > 60.0 && snapshot.score > 150 {
            difficulty += 0.5;
        }
        // Last life
        if snapshot.lives == 1 {
            difficulty -= 0.25;
        }

        clamp_difficulty(difficulty)
    }

    /// Mean of linear and network outputs, clamped; trains lazily on first use
    pub fn predict_with_ml(&mut self, snapshot: &SessionSnapshot) -> f64 {
        if !self.trained {
            self.train_models();
        }
        self.ml_estimate(snapshot)
    }

    /// 60% rule-based + 40% ML, clamped; trains lazily on first use
    pub fn predict_hybrid(&mut self, snapshot: &SessionSnapshot) -> f64 {
        let rule_based = Self::predict_difficulty(snapshot);
        let ml = self.predict_with_ml(snapshot);
        clamp_difficulty(HYBRID_RULE_WEIGHT * rule_based + HYBRID_ML_WEIGHT * ml)
    }

    /// A missing or non-finite model output counts as `base_difficulty`.
    /// The linear model diverges on the unscaled corpus, so in practice its
    /// term is usually the base.
    fn ml_estimate(&self, snapshot: &SessionSnapshot) -> f64 {
        let features = snapshot.features();
        let base = features.base_difficulty;
        let linear = self
            .linear
            .predict(&features)
            .filter(|v| v.is_finite())
            .unwrap_or(base);
        let neural = self
            .network
            .as_ref()
            .map(|network| network.predict(&features))
            .filter(|v| v.is_finite())
            .unwrap_or(base);
        clamp_difficulty((linear + neural) / 2.0)
    }
}

impl Default for DifficultyPredictor {
    fn default() -> Self {
        Self::from_entropy()
    }
}

//! Adaptive difficulty
//!
//! A rule-based heuristic plus two small predictors (linear regressor and a
//! one-hidden-layer network) trained on a fixed corpus. Everything here is a
//! pure function of a `SessionSnapshot` and the predictor's own parameters;
//! nothing holds a reference to live session state.

pub mod features;
pub mod linear;
pub mod network;
pub mod predictor;

pub use features::{FEATURE_COUNT, FeatureVector, SessionSnapshot, TrainingSample};
pub use linear::LinearRegressor;
pub use network::{HIDDEN_SIZE, ShallowNetwork};
pub use predictor::{DifficultyPredictor, TRAINING_CORPUS};

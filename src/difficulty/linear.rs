//! Single-layer linear regressor trained with plain SGD

use serde::{Deserialize, Serialize};

use super::features::{FeatureVector, TrainingSample};

/// SGD step size
pub const LEARNING_RATE: f64 = 0.01;
/// Passes over the samples per `train` call
pub const EPOCHS: usize = 100;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinearRegressor {
    weights: Vec<f64>,
    bias: f64,
}

impl LinearRegressor {
    /// Untrained regressor (no weights yet)
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a training call has sized the weight vector
    pub fn is_trained(&self) -> bool {
        !self.weights.is_empty()
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Fit on `samples` in order, exactly `EPOCHS * samples.len()` updates.
    ///
    /// Weights and bias restart from zero on every call, sized to the
    /// sample dimension. An empty slice leaves the model untouched.
    pub fn train(&mut self, samples: &[TrainingSample]) {
        let Some(first) = samples.first() else {
            return;
        };
        let feature_count = first.features.to_array().len();
        self.weights = vec![0.0; feature_count];
        self.bias = 0.0;

        for _ in 0..EPOCHS {
            for sample in samples {
                let x = sample.features.to_array();
                let error = self.raw_predict(&x) - sample.target;
                for (w, xi) in self.weights.iter_mut().zip(x.iter()) {
                    *w -= LEARNING_RATE * error * xi;
                }
                self.bias -= LEARNING_RATE * error;
            }
        }
    }

    /// `bias + Σ wᵢxᵢ`, or `None` before any training
    pub fn predict(&self, features: &FeatureVector) -> Option<f64> {
        if !self.is_trained() {
            return None;
        }
        Some(self.raw_predict(&features.to_array()))
    }

    fn raw_predict(&self, x: &[f64]) -> f64 {
        self.weights
            .iter()
            .zip(x.iter())
            .fold(self.bias, |acc, (w, xi)| acc + w * xi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(x: f64, target: f64) -> TrainingSample {
        TrainingSample::new(FeatureVector::new(x, 0.0, 0.0, 0.0, 0.0, 0.0), target)
    }

    #[test]
    fn test_untrained_predict_is_none() {
        let model = LinearRegressor::new();
        assert!(!model.is_trained());
        assert_eq!(model.predict(&FeatureVector::new(1.0, 1.0, 1.0, 1.0, 1.0, 1.0)), None);
    }

    #[test]
    fn test_single_sample_closed_form() {
        // With one sample x=1, w+b follows s' = s - 2*lr*(s - 1) from s=0
        let mut model = LinearRegressor::new();
        model.train(&[sample(1.0, 1.0)]);

        let expected = 1.0 - (1.0 - 2.0 * LEARNING_RATE).powi(EPOCHS as i32);
        let got = model.predict(&FeatureVector::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0));
        let got = got.unwrap_or_default();
        assert!((got - expected).abs() < 1e-12, "got {got}, expected {expected}");
        assert_eq!(model.weights().len(), 6);
        assert!((model.weights()[0] - model.bias()).abs() < 1e-12);
    }

    #[test]
    fn test_retrain_restarts_from_zero() {
        let samples = [sample(1.0, 1.0), sample(2.0, 3.0)];
        let mut once = LinearRegressor::new();
        once.train(&samples);

        let mut twice = LinearRegressor::new();
        twice.train(&samples);
        twice.train(&samples);

        assert_eq!(once.weights(), twice.weights());
        assert_eq!(once.bias(), twice.bias());
    }

    #[test]
    fn test_predict_does_not_mutate() {
        let mut model = LinearRegressor::new();
        model.train(&[sample(1.0, 1.0), sample(2.0, 3.0)]);
        let x = FeatureVector::new(1.5, 0.0, 0.0, 0.0, 0.0, 0.0);
        let a = model.predict(&x);
        let b = model.predict(&x);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_training_is_noop() {
        let mut model = LinearRegressor::new();
        model.train(&[]);
        assert!(!model.is_trained());
    }
}

//! One-hidden-layer network (sigmoid hidden units, linear output)
//!
//! Plain per-sample SGD: no momentum, regularization or batching.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::features::{FeatureVector, TrainingSample};

/// Hidden layer width
pub const HIDDEN_SIZE: usize = 4;
/// SGD step size
pub const LEARNING_RATE: f64 = 0.01;
/// Default passes over the samples per `train` call
pub const DEFAULT_EPOCHS: usize = 50;
/// Initial weights are drawn uniformly from [-INIT_RANGE, INIT_RANGE]
pub const INIT_RANGE: f64 = 0.1;

#[inline]
fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Applied to the stored hidden activation during backprop, so the
/// activation passes through `sigmoid` a second time.
#[inline]
fn sigmoid_derivative(x: f64) -> f64 {
    let s = sigmoid(x);
    s * (1.0 - s)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShallowNetwork {
    /// HIDDEN_SIZE × input_size
    weights1: Vec<Vec<f64>>,
    bias1: Vec<f64>,
    /// hidden → output
    weights2: Vec<f64>,
    bias2: f64,
}

impl ShallowNetwork {
    /// Random weights in [-0.1, 0.1], zero biases
    pub fn new<R: Rng>(input_size: usize, rng: &mut R) -> Self {
        let weights1: Vec<Vec<f64>> = (0..HIDDEN_SIZE)
            .map(|_| {
                (0..input_size)
                    .map(|_| rng.random_range(-INIT_RANGE..=INIT_RANGE))
                    .collect()
            })
            .collect();
        let weights2: Vec<f64> = (0..HIDDEN_SIZE)
            .map(|_| rng.random_range(-INIT_RANGE..=INIT_RANGE))
            .collect();

        Self {
            weights1,
            bias1: vec![0.0; HIDDEN_SIZE],
            weights2,
            bias2: 0.0,
        }
    }

    /// Build from explicit parameters (one `weights1` row per hidden unit)
    pub fn from_parameters(
        weights1: [Vec<f64>; HIDDEN_SIZE],
        bias1: [f64; HIDDEN_SIZE],
        weights2: [f64; HIDDEN_SIZE],
        bias2: f64,
    ) -> Self {
        Self {
            weights1: weights1.into_iter().collect(),
            bias1: bias1.to_vec(),
            weights2: weights2.to_vec(),
            bias2,
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights1.first().map_or(0, Vec::len)
    }

    pub fn weights1(&self) -> &[Vec<f64>] {
        &self.weights1
    }

    pub fn weights2(&self) -> &[f64] {
        &self.weights2
    }

    fn hidden(&self, x: &[f64]) -> [f64; HIDDEN_SIZE] {
        let mut hidden = [0.0; HIDDEN_SIZE];
        for (i, h) in hidden.iter_mut().enumerate() {
            let sum = self.weights1[i]
                .iter()
                .zip(x.iter())
                .fold(self.bias1[i], |acc, (w, xi)| acc + w * xi);
            *h = sigmoid(sum);
        }
        hidden
    }

    fn output(&self, hidden: &[f64; HIDDEN_SIZE]) -> f64 {
        self.weights2
            .iter()
            .zip(hidden.iter())
            .fold(self.bias2, |acc, (w, h)| acc + w * h)
    }

    /// Forward pass only; output is not clamped
    pub fn predict(&self, features: &FeatureVector) -> f64 {
        let hidden = self.hidden(&features.to_array());
        self.output(&hidden)
    }

    /// Continue SGD from the current weights for `epochs` passes
    pub fn train(&mut self, samples: &[TrainingSample], epochs: usize) {
        for _ in 0..epochs {
            for sample in samples {
                let x = sample.features.to_array();
                let hidden = self.hidden(&x);
                let output_error = self.output(&hidden) - sample.target;

                for (w, h) in self.weights2.iter_mut().zip(hidden.iter()) {
                    *w -= LEARNING_RATE * output_error * h;
                }
                self.bias2 -= LEARNING_RATE * output_error;

                // Uses weights2 as updated just above
                for (i, h) in hidden.iter().enumerate() {
                    let hidden_error = output_error * self.weights2[i] * sigmoid_derivative(*h);
                    for (w, xj) in self.weights1[i].iter_mut().zip(x.iter()) {
                        *w -= LEARNING_RATE * hidden_error * xj;
                    }
                    self.bias1[i] -= LEARNING_RATE * hidden_error;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn unit_input() -> FeatureVector {
        FeatureVector::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0)
    }

    fn zero_network() -> ShallowNetwork {
        let row = vec![0.0; 6];
        ShallowNetwork::from_parameters(
            [row.clone(), row.clone(), row.clone(), row],
            [0.0; HIDDEN_SIZE],
            [0.0; HIDDEN_SIZE],
            0.0,
        )
    }

    #[test]
    fn test_init_shape_and_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        let net = ShallowNetwork::new(6, &mut rng);
        assert_eq!(net.input_size(), 6);
        assert_eq!(net.weights1().len(), HIDDEN_SIZE);
        assert_eq!(net.weights2().len(), HIDDEN_SIZE);
        let all = net.weights1().iter().flatten().chain(net.weights2().iter());
        for w in all {
            assert!((-INIT_RANGE..=INIT_RANGE).contains(w));
        }
    }

    #[test]
    fn test_seeded_init_is_reproducible() {
        let a = ShallowNetwork::new(6, &mut Pcg32::seed_from_u64(42));
        let b = ShallowNetwork::new(6, &mut Pcg32::seed_from_u64(42));
        assert_eq!(a.weights1(), b.weights1());
        assert_eq!(a.predict(&unit_input()), b.predict(&unit_input()));
    }

    #[test]
    fn test_zero_network_predicts_zero() {
        assert_eq!(zero_network().predict(&unit_input()), 0.0);
    }

    #[test]
    fn test_single_step_matches_hand_computation() {
        let mut net = zero_network();
        net.train(&[TrainingSample::new(unit_input(), 1.0)], 1);

        // Forward: hidden = sigmoid(0) = 0.5, output = 0, error = -1
        let w2 = LEARNING_RATE * 0.5;
        let b2 = LEARNING_RATE;
        // Derivative sees the stored activation 0.5, not the pre-activation 0
        let s = sigmoid(0.5);
        let hidden_error = -1.0 * w2 * s * (1.0 - s);
        let w1 = -LEARNING_RATE * hidden_error;
        let b1 = -LEARNING_RATE * hidden_error;

        for i in 0..HIDDEN_SIZE {
            assert!((net.weights2()[i] - w2).abs() < 1e-15);
            assert!((net.weights1()[i][0] - w1).abs() < 1e-15);
            assert_eq!(net.weights1()[i][1], 0.0);
        }

        let h = sigmoid(w1 + b1);
        let expected = b2 + HIDDEN_SIZE as f64 * w2 * h;
        assert!((net.predict(&unit_input()) - expected).abs() < 1e-15);
    }

    #[test]
    fn test_training_reduces_error() {
        let mut net = ShallowNetwork::new(6, &mut Pcg32::seed_from_u64(3));
        let sample = TrainingSample::new(unit_input(), 2.0);
        let before = (net.predict(&unit_input()) - 2.0).abs();
        net.train(&[sample], DEFAULT_EPOCHS);
        let after = (net.predict(&unit_input()) - 2.0).abs();
        assert!(after < before);
    }
}

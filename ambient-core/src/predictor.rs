// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Mood predictor — a small feed-forward network with an online update.
//!
//! `features (7) → hidden (8, sigmoid) → moods (5, sigmoid)`
//!
//! Outputs are independent propensities per mood, not a softmax. Training is
//! a crude delta step on the output layer only: the hidden layer keeps its
//! random projection forever. This is an approximation, not backpropagation.
//! Other learners plug in through `MoodLearner`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::trace;

use crate::config::PredictorConfig;
use crate::fusion::{FeatureVector, FEATURE_DIM};
use crate::mood::{MoodScores, MOOD_COUNT};

/// Trait for online learners that score moods from fused features.
pub trait MoodLearner: Send + Sync {
    /// Score every mood in [0, 1].
    fn predict(&self, features: &FeatureVector) -> MoodScores;

    /// Take one incremental step toward `target`.
    fn train(&mut self, features: &FeatureVector, target: &MoodScores);

    /// Number of `train` calls applied so far.
    fn training_steps(&self) -> u64;

    /// Name of this learner.
    fn name(&self) -> &str;
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

// ─── Neural Predictor ────────────────────────────────

/// Two-layer sigmoid network.
///
/// Weights are row-major: `w_hidden[h * FEATURE_DIM + i]`,
/// `w_output[o * hidden_dim + h]`.
#[derive(Debug, Clone, Serialize)]
pub struct NeuralPredictor {
    hidden_dim: usize,
    w_hidden: Vec<f32>,
    b_hidden: Vec<f32>,
    w_output: Vec<f32>,
    b_output: Vec<f32>,
    learning_rate: f32,
    error_threshold: f32,
    steps: u64,
}

impl NeuralPredictor {
    /// Create a network with weights drawn uniformly from [-1, 1].
    pub fn new(config: &PredictorConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let hidden_dim = config.hidden_units.max(1);
        let mut uniform = |n: usize| -> Vec<f32> { (0..n).map(|_| rng.gen_range(-1.0f32..=1.0)).collect() };

        let w_hidden = uniform(hidden_dim * FEATURE_DIM);
        let b_hidden = uniform(hidden_dim);
        let w_output = uniform(MOOD_COUNT * hidden_dim);
        let b_output = uniform(MOOD_COUNT);

        Self {
            hidden_dim,
            w_hidden,
            b_hidden,
            w_output,
            b_output,
            learning_rate: config.learning_rate,
            error_threshold: config.error_threshold,
            steps: 0,
        }
    }

    /// Hidden layer activations.
    pub fn hidden(&self, features: &FeatureVector) -> Vec<f32> {
        (0..self.hidden_dim)
            .map(|h| {
                let row = &self.w_hidden[h * FEATURE_DIM..(h + 1) * FEATURE_DIM];
                let pre: f32 = row.iter().zip(features.as_slice()).map(|(w, x)| w * x).sum();
                sigmoid(pre + self.b_hidden[h])
            })
            .collect()
    }

    fn output_from_hidden(&self, hidden: &[f32]) -> MoodScores {
        let mut out = [0.0f32; MOOD_COUNT];
        for (o, slot) in out.iter_mut().enumerate() {
            let row = &self.w_output[o * self.hidden_dim..(o + 1) * self.hidden_dim];
            let pre: f32 = row.iter().zip(hidden).map(|(w, h)| w * h).sum();
            *slot = sigmoid(pre + self.b_output[o]);
        }
        MoodScores(out)
    }

    pub fn hidden_dim(&self) -> usize {
        self.hidden_dim
    }

    /// Input-to-hidden weights, row-major by hidden unit.
    pub fn hidden_weights(&self) -> &[f32] {
        &self.w_hidden
    }

    /// Hidden-to-output weights, row-major by mood.
    pub fn output_weights(&self) -> &[f32] {
        &self.w_output
    }

    pub fn output_biases(&self) -> &[f32] {
        &self.b_output
    }

    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    /// Total trainable parameters.
    pub fn num_parameters(&self) -> usize {
        self.w_hidden.len() + self.b_hidden.len() + self.w_output.len() + self.b_output.len()
    }
}

impl MoodLearner for NeuralPredictor {
    fn predict(&self, features: &FeatureVector) -> MoodScores {
        let hidden = self.hidden(features);
        self.output_from_hidden(&hidden)
    }

    fn train(&mut self, features: &FeatureVector, target: &MoodScores) {
        let hidden = self.hidden(features);
        let output = self.output_from_hidden(&hidden);
        let mut updated = 0usize;

        for o in 0..MOOD_COUNT {
            let error = target.0[o] - output.0[o];
            if error.abs() <= self.error_threshold {
                continue;
            }
            let step = self.learning_rate * error;
            let row = &mut self.w_output[o * self.hidden_dim..(o + 1) * self.hidden_dim];
            for (w, h) in row.iter_mut().zip(&hidden) {
                *w += step * h;
            }
            self.b_output[o] += step;
            updated += 1;
        }

        self.steps += 1;
        trace!(step = self.steps, outputs_updated = updated, "predictor trained");
    }

    fn training_steps(&self) -> u64 {
        self.steps
    }

    fn name(&self) -> &str {
        "neural"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mood::Mood;

    fn seeded(seed: u64) -> NeuralPredictor {
        NeuralPredictor::new(&PredictorConfig {
            seed: Some(seed),
            ..PredictorConfig::default()
        })
    }

    fn energetic_features() -> FeatureVector {
        FeatureVector([0.8, 0.2, 0.45, 0.3, 0.75, 0.0, 0.6])
    }

    #[test]
    fn test_shape_and_init_range() {
        let net = seeded(1);
        assert_eq!(net.hidden_dim, 8);
        assert_eq!(net.num_parameters(), 8 * 7 + 8 + 5 * 8 + 5);
        for &w in net.w_hidden.iter().chain(&net.w_output) {
            assert!((-1.0..=1.0).contains(&w));
        }
    }

    #[test]
    fn test_outputs_bounded() {
        let net = seeded(3);
        for x in [FeatureVector([0.0; 7]), FeatureVector([1.0; 7]), energetic_features()] {
            let scores = net.predict(&x);
            for (_, v) in scores.iter() {
                assert!((0.0..=1.0).contains(&v));
            }
        }
    }

    #[test]
    fn test_seeded_reproducible() {
        let a = seeded(42);
        let b = seeded(42);
        assert_eq!(a.predict(&energetic_features()), b.predict(&energetic_features()));
        let c = seeded(43);
        assert_ne!(a.w_output, c.w_output);
    }

    #[test]
    fn test_training_converges_toward_target() {
        let mut net = seeded(7);
        let x = energetic_features();
        let mut target = MoodScores::splat(0.05);
        target.set(Mood::Energetic, 1.0);

        for _ in 0..5000 {
            net.train(&x, &target);
        }

        let out = net.predict(&x);
        assert!(out.get(Mood::Energetic) > 0.85, "energetic = {}", out.get(Mood::Energetic));
        for mood in [Mood::Social, Mood::Contemplative, Mood::Mysterious, Mood::Peaceful] {
            assert!(out.get(mood) < 0.2, "{mood} = {}", out.get(mood));
        }
        assert_eq!(net.best_for(&x), Mood::Energetic);
        assert_eq!(net.training_steps(), 5000);
    }

    #[test]
    fn test_small_errors_skip_update() {
        let mut net = seeded(9);
        let x = energetic_features();
        let target = net.predict(&x);
        let before = net.w_output.clone();
        net.train(&x, &target);
        assert_eq!(net.w_output, before);
        assert_eq!(net.training_steps(), 1);
    }

    #[test]
    fn test_hidden_layer_frozen() {
        let mut net = seeded(11);
        let hidden_before = net.w_hidden.clone();
        net.train(&energetic_features(), &MoodScores::splat(1.0));
        assert_eq!(net.w_hidden, hidden_before);
    }

    #[test]
    fn test_accessors_expose_consistent_shape() {
        let mut net = NeuralPredictor::new(&PredictorConfig {
            hidden_units: 5,
            seed: Some(13),
            ..PredictorConfig::default()
        });
        net.train(&energetic_features(), &MoodScores::splat(1.0));
        assert_eq!(net.hidden_dim(), 5);
        assert_eq!(net.hidden_weights().len(), 5 * FEATURE_DIM);
        assert_eq!(net.output_weights().len(), MOOD_COUNT * 5);
        assert_eq!(net.output_biases().len(), MOOD_COUNT);
        assert!((net.learning_rate() - 0.01).abs() < f32::EPSILON);
    }

    #[test]
    fn test_trait_object() {
        let learner: Box<dyn MoodLearner> = Box::new(seeded(5));
        assert_eq!(learner.name(), "neural");
        let _ = learner.predict(&energetic_features());
    }

    impl NeuralPredictor {
        fn best_for(&self, x: &FeatureVector) -> Mood {
            self.predict(x).best().0
        }
    }
}

// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Configuration for the ambient mood engine.
//!
//! Aggregates all sub-configurations into a single `EngineConfig` struct
//! with presets for different deployment temperaments.

use serde::{Deserialize, Serialize};

/// Feature fusion parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusionConfig {
    /// People count that maps to a full crowd (1.0).
    pub crowd_scale: f32,
    /// Overall-energy blend weights: [crowd, movement, audio energy].
    pub energy_weights: [f32; 3],
    /// Crowd share of the social index; the rest is conversational likelihood.
    pub social_crowd_weight: f32,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            crowd_scale: 50.0,
            energy_weights: [0.2, 0.4, 0.4],
            social_crowd_weight: 0.5,
        }
    }
}

/// Mood predictor (small feed-forward network) parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Hidden layer width.
    pub hidden_units: usize,
    /// Step size of the online update.
    pub learning_rate: f32,
    /// Outputs with |error| at or below this are left untouched.
    pub error_threshold: f32,
    /// Weight initialization seed. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            hidden_units: 8,
            learning_rate: 0.01,
            error_threshold: 0.1,
            seed: None,
        }
    }
}

/// Pattern store parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternConfig {
    /// Maximum number of patterns retained after pruning.
    pub capacity: usize,
    /// EMA smoothing factor for success rates.
    pub smoothing: f32,
    /// Engagement above which an uncovered context spawns a new pattern.
    pub creation_threshold: f32,
    /// Confidence assigned to newly synthesized patterns.
    pub initial_confidence: f32,
    /// Install the built-in starter rules on construction.
    pub seed_defaults: bool,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            capacity: 50,
            smoothing: 0.1,
            creation_threshold: 0.8,
            initial_confidence: 0.6,
            seed_defaults: false,
        }
    }
}

/// History store and similarity retrieval parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum records before the oldest are evicted.
    pub capacity: usize,
    /// Minimum similarity for a record to count as "similar".
    pub similarity_threshold: f32,
    /// Maximum similar records consulted per decision.
    pub top_k: usize,
    /// Fewer similar records than this yields a uniform history signal.
    pub min_similar: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            similarity_threshold: 0.7,
            top_k: 10,
            min_similar: 3,
        }
    }
}

/// Signal combination weights and forecast fallbacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionConfig {
    /// Fixed weight of the neural signal.
    pub neural_weight: f32,
    /// Pattern signal weight, scaled by the pattern signal's confidence.
    pub pattern_weight: f32,
    /// History signal weight, scaled by the history signal's confidence.
    pub history_weight: f32,
    /// Fixed weight of the temporal heuristic.
    pub temporal_weight: f32,
    /// Forecast engagement when no history exists for the mood.
    pub default_engagement: f32,
    /// Forecast audience retention when no history exists for the mood.
    pub default_retention: f32,
    /// Forecast duration when no history exists for the mood.
    pub default_duration_secs: f32,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            neural_weight: 0.4,
            pattern_weight: 0.25,
            history_weight: 0.25,
            temporal_weight: 0.1,
            default_engagement: 0.7,
            default_retention: 0.6,
            default_duration_secs: 300.0,
        }
    }
}

/// A/B test controller parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbTestConfig {
    /// Total samples after which the active test auto-completes.
    pub sample_threshold: usize,
    /// Completed results retained; the oldest are dropped beyond this.
    pub history_capacity: usize,
}

impl Default for AbTestConfig {
    fn default() -> Self {
        Self {
            sample_threshold: 50,
            history_capacity: 100,
        }
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub fusion: FusionConfig,
    pub predictor: PredictorConfig,
    pub patterns: PatternConfig,
    pub history: HistoryConfig,
    pub decision: DecisionConfig,
    pub ab_test: AbTestConfig,
}

impl EngineConfig {
    /// Faster adaptation for venues whose crowd changes quickly.
    pub fn responsive() -> Self {
        Self {
            predictor: PredictorConfig {
                learning_rate: 0.05,
                ..PredictorConfig::default()
            },
            patterns: PatternConfig {
                smoothing: 0.25,
                creation_threshold: 0.75,
                ..PatternConfig::default()
            },
            history: HistoryConfig {
                capacity: 250,
                similarity_threshold: 0.6,
                ..HistoryConfig::default()
            },
            ab_test: AbTestConfig {
                sample_threshold: 30,
                ..AbTestConfig::default()
            },
            ..Self::default()
        }
    }

    /// Slow, evidence-heavy adaptation.
    pub fn conservative() -> Self {
        Self {
            predictor: PredictorConfig {
                learning_rate: 0.005,
                ..PredictorConfig::default()
            },
            patterns: PatternConfig {
                smoothing: 0.05,
                creation_threshold: 0.9,
                ..PatternConfig::default()
            },
            history: HistoryConfig {
                similarity_threshold: 0.8,
                min_similar: 5,
                ..HistoryConfig::default()
            },
            ab_test: AbTestConfig {
                sample_threshold: 100,
                ..AbTestConfig::default()
            },
            ..Self::default()
        }
    }

    /// Default parameters plus the built-in starter patterns.
    pub fn venue_defaults() -> Self {
        Self {
            patterns: PatternConfig {
                seed_defaults: true,
                ..PatternConfig::default()
            },
            ..Self::default()
        }
    }

    /// Pin the predictor seed for reproducible weights.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.predictor.seed = Some(seed);
        self
    }

    /// Validate the configuration, returning any issues found.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.fusion.crowd_scale < 1.0 {
            issues.push(format!("fusion.crowd_scale {} must be >= 1", self.fusion.crowd_scale));
        }
        if self.fusion.energy_weights.iter().any(|w| *w < 0.0) {
            issues.push("fusion.energy_weights must be non-negative".into());
        }
        let weight_sum: f32 = self.fusion.energy_weights.iter().sum();
        if (weight_sum - 1.0).abs() > 1e-3 {
            issues.push(format!("fusion.energy_weights sum to {weight_sum}, expected 1.0"));
        }
        if !(0.0..=1.0).contains(&self.fusion.social_crowd_weight) {
            issues.push(format!(
                "fusion.social_crowd_weight {} out of range [0, 1]",
                self.fusion.social_crowd_weight
            ));
        }

        if self.predictor.hidden_units == 0 {
            issues.push("predictor.hidden_units must be > 0".into());
        }
        if self.predictor.learning_rate <= 0.0 || self.predictor.learning_rate > 1.0 {
            issues.push(format!(
                "predictor.learning_rate {} out of range (0, 1]",
                self.predictor.learning_rate
            ));
        }

        if self.patterns.capacity == 0 {
            issues.push("patterns.capacity must be > 0".into());
        }
        if self.patterns.smoothing <= 0.0 || self.patterns.smoothing > 1.0 {
            issues.push(format!("patterns.smoothing {} out of range (0, 1]", self.patterns.smoothing));
        }
        if !(0.0..=1.0).contains(&self.patterns.creation_threshold) {
            issues.push(format!(
                "patterns.creation_threshold {} out of range [0, 1]",
                self.patterns.creation_threshold
            ));
        }

        if self.history.capacity == 0 {
            issues.push("history.capacity must be > 0".into());
        }
        if !(0.0..=1.0).contains(&self.history.similarity_threshold) {
            issues.push(format!(
                "history.similarity_threshold {} out of range [0, 1]",
                self.history.similarity_threshold
            ));
        }
        if self.history.top_k == 0 {
            issues.push("history.top_k must be > 0".into());
        }

        let d = &self.decision;
        if [d.neural_weight, d.pattern_weight, d.history_weight, d.temporal_weight]
            .iter()
            .any(|w| *w < 0.0)
        {
            issues.push("decision weights must be non-negative".into());
        }
        if d.neural_weight + d.temporal_weight <= 0.0 {
            issues.push("decision.neural_weight + decision.temporal_weight must be > 0".into());
        }
        if d.default_duration_secs <= 0.0 {
            issues.push("decision.default_duration_secs must be > 0".into());
        }

        if self.ab_test.sample_threshold < 2 {
            issues.push("ab_test.sample_threshold must be >= 2".into());
        }
        if self.ab_test.history_capacity == 0 {
            issues.push("ab_test.history_capacity must be > 0".into());
        }

        issues
    }
}

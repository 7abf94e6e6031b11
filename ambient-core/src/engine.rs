// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! MoodEngine — top-level orchestrator of the ambient mood loop.
//!
//! Composes feature fusion, the neural predictor, the pattern and history
//! stores, and the A/B controller. Prediction borrows the engine immutably;
//! every learning step borrows it mutably, so a caller can never observe a
//! half-applied outcome.

use std::collections::BTreeMap;

use anyhow::bail;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::ab_test::{ABTest, ABTestResult, AbTestController};
use crate::config::EngineConfig;
use crate::context::Context;
use crate::decision::{self, MoodPrediction, SignalDistribution};
use crate::error::Result;
use crate::fusion::{to_feature_vector, FeatureVector};
use crate::history::{HistoryStore, LearningRecord, MoodPerformance, Outcome};
use crate::mood::{Mood, MoodScores};
use crate::patterns::{PatternStore, PatternUpdate};
use crate::predictor::{MoodLearner, NeuralPredictor};

/// Target value for moods that were not applied.
const OFF_TARGET: f32 = 0.05;

/// The ambient mood decision and learning engine.
pub struct MoodEngine {
    pub(crate) config: EngineConfig,
    pub(crate) predictor: NeuralPredictor,
    pub(crate) patterns: PatternStore,
    pub(crate) history: HistoryStore,
    pub(crate) ab_tests: AbTestController,
    pub(crate) current: Option<MoodPrediction>,
}

impl MoodEngine {
    /// Create an engine. Configuration issues are logged, not rejected.
    pub fn new(config: EngineConfig) -> Self {
        for issue in config.validate() {
            warn!(%issue, "engine configuration issue");
        }
        Self::build(config)
    }

    /// Create an engine, rejecting an invalid configuration.
    pub fn try_new(config: EngineConfig) -> anyhow::Result<Self> {
        let issues = config.validate();
        if !issues.is_empty() {
            bail!("invalid engine configuration: {}", issues.join("; "));
        }
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        Self {
            predictor: NeuralPredictor::new(&config.predictor),
            patterns: PatternStore::new(config.patterns.clone()),
            history: HistoryStore::new(config.history.capacity),
            ab_tests: AbTestController::new(config.ab_test.clone()),
            current: None,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fused features for `context`.
    pub fn features(&self, context: &Context) -> FeatureVector {
        to_feature_vector(context, &self.config.fusion)
    }

    // ─── Decision ────────────────────────────────────

    /// Recommend a mood for `context`. Total: missing sensors and empty
    /// stores degrade to fallbacks, never to errors.
    pub fn predict_optimal_mood(&self, context: &Context) -> MoodPrediction {
        let features = self.features(context);
        let neural = decision::neural_signal(self.predictor.predict(&features));
        let pattern = self.pattern_distribution(context);
        let history = self.history_distribution(context);

        let prediction = decision::decide(
            context,
            &features,
            neural,
            pattern,
            history,
            &self.history,
            &self.config.decision,
        );

        let w = prediction.signals.weights;
        debug!(
            mood = %prediction.recommended_mood,
            confidence = prediction.confidence,
            w_neural = w.neural,
            w_pattern = w.pattern,
            w_history = w.history,
            w_temporal = w.temporal,
            "mood predicted"
        );
        prediction
    }

    /// Pattern signal for `context`.
    pub fn pattern_distribution(&self, context: &Context) -> SignalDistribution {
        decision::pattern_signal(&self.patterns, context)
    }

    /// History signal for `context`.
    pub fn history_distribution(&self, context: &Context) -> SignalDistribution {
        decision::history_signal(&self.history, context, &self.config.history)
    }

    /// Predict and cache the result as the current prediction.
    pub fn refresh_prediction(&mut self, context: &Context) -> &MoodPrediction {
        let prediction = self.predict_optimal_mood(context);
        self.current.insert(prediction)
    }

    /// Most recent cached prediction.
    pub fn current_prediction(&self) -> Option<&MoodPrediction> {
        self.current.as_ref()
    }

    // ─── Learning ────────────────────────────────────

    /// Learn from an applied mood identified by name.
    ///
    /// Validation happens first; on error nothing is changed.
    pub fn record_outcome(&mut self, context: &Context, mood: &str, outcome: Outcome) -> Result<()> {
        let mood: Mood = mood.parse()?;
        self.record_mood_outcome(context, mood, outcome)
    }

    /// Typed variant of `record_outcome`.
    pub fn record_mood_outcome(&mut self, context: &Context, mood: Mood, outcome: Outcome) -> Result<()> {
        outcome.validate()?;

        let features = self.features(context);
        let mut target = MoodScores::splat(OFF_TARGET);
        target.set(mood, outcome.engagement);
        self.predictor.train(&features, &target);

        let PatternUpdate { reinforced, created, .. } =
            self.patterns.update(context, mood, outcome.engagement);

        let evicted = self.history.append(LearningRecord::new(context.clone(), mood, outcome));
        debug!(
            %mood,
            engagement = outcome.engagement,
            patterns_reinforced = reinforced,
            pattern_created = created.is_some(),
            evicted = evicted.is_some(),
            "outcome recorded"
        );
        Ok(())
    }

    pub fn predictor(&self) -> &NeuralPredictor {
        &self.predictor
    }

    /// Direct access to the predictor, e.g. for offline pre-training.
    pub fn predictor_mut(&mut self) -> &mut NeuralPredictor {
        &mut self.predictor
    }

    pub fn patterns(&self) -> &PatternStore {
        &self.patterns
    }

    pub fn patterns_mut(&mut self) -> &mut PatternStore {
        &mut self.patterns
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    // ─── A/B tests ───────────────────────────────────

    pub fn start_ab_test(&mut self, mood_a: &str, mood_b: &str, context_label: &str) -> Result<Uuid> {
        self.ab_tests.start_test(mood_a, mood_b, context_label)
    }

    pub fn record_ab_result(&mut self, test_id: Uuid, mood: &str, engagement: f32) -> Result<Option<ABTestResult>> {
        self.ab_tests.record_result(test_id, mood, engagement)
    }

    pub fn complete_ab_test(&mut self) -> Option<ABTestResult> {
        self.ab_tests.complete_test()
    }

    pub fn cancel_ab_test(&mut self) -> Option<ABTest> {
        self.ab_tests.cancel_test()
    }

    pub fn active_ab_test(&self) -> Option<&ABTest> {
        self.ab_tests.active()
    }

    pub fn ab_test_history(&self) -> &[ABTestResult] {
        self.ab_tests.history()
    }

    // ─── Stats ───────────────────────────────────────

    pub fn stats(&self) -> LearningStats {
        let per_mood = Mood::ALL
            .iter()
            .filter_map(|&mood| self.history.performance(mood).map(|p| (mood, p)))
            .collect();
        LearningStats {
            total_records: self.history.len(),
            pattern_count: self.patterns.len(),
            training_steps: self.predictor.training_steps(),
            average_engagement: self.history.average_engagement().unwrap_or(0.0),
            per_mood,
            completed_tests: self.ab_tests.history().len(),
            active_test: self.ab_tests.active().map(|t| t.id),
        }
    }
}

impl Default for MoodEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Summary of what the engine has learned so far.
#[derive(Debug, Clone, Serialize)]
pub struct LearningStats {
    pub total_records: usize,
    pub pattern_count: usize,
    pub training_steps: u64,
    /// Mean engagement over all records (0 with no history).
    pub average_engagement: f32,
    /// Only moods that have been applied at least once.
    pub per_mood: BTreeMap<Mood, MoodPerformance>,
    pub completed_tests: usize,
    pub active_test: Option<Uuid>,
}

// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Blends four per-mood signals into one recommendation.
//!
//! | signal   | source                         | weight                    |
//! |----------|--------------------------------|---------------------------|
//! | neural   | predictor output, normalized   | fixed                     |
//! | pattern  | matching pattern votes         | scaled by its confidence  |
//! | history  | similar past outcomes          | scaled by its confidence  |
//! | temporal | time-of-day / day-type nudges  | fixed                     |
//!
//! Signals without evidence are exactly uniform with confidence 0 and get
//! zero weight.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{DecisionConfig, HistoryConfig};
use crate::context::{Context, DayType, Environment, TimeOfDay};
use crate::fusion::FeatureVector;
use crate::history::HistoryStore;
use crate::mood::{Mood, MoodParameters, MoodScores};
use crate::patterns::PatternStore;

/// Share of a mood's default profile kept when blending in live context.
const PROFILE_SHARE: f32 = 0.7;

// ─── Signals ─────────────────────────────────────────

/// One per-mood distribution plus how much it should be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalDistribution {
    pub scores: MoodScores,
    /// [0, 1]. Scales the signal's weight for evidence-driven signals.
    pub confidence: f32,
    /// Pieces of evidence behind the signal (patterns matched, records found).
    pub evidence: usize,
}

impl SignalDistribution {
    /// No evidence: exactly uniform, zero confidence.
    pub fn uniform() -> Self {
        Self {
            scores: MoodScores::uniform(),
            confidence: 0.0,
            evidence: 0,
        }
    }

    fn certain(scores: MoodScores) -> Self {
        Self {
            scores,
            confidence: 1.0,
            evidence: 0,
        }
    }
}

/// Weights actually applied to each signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalWeights {
    pub neural: f32,
    pub pattern: f32,
    pub history: f32,
    pub temporal: f32,
}

impl SignalWeights {
    pub fn total(&self) -> f32 {
        self.neural + self.pattern + self.history + self.temporal
    }
}

/// Every signal that went into a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalBreakdown {
    pub neural: SignalDistribution,
    pub pattern: SignalDistribution,
    pub history: SignalDistribution,
    pub temporal: SignalDistribution,
    pub weights: SignalWeights,
    pub combined: MoodScores,
}

/// Neural signal from raw predictor output.
pub fn neural_signal(raw: MoodScores) -> SignalDistribution {
    SignalDistribution::certain(raw.normalized())
}

/// Pattern signal: each matching pattern votes `success_rate × confidence`.
pub fn pattern_signal(patterns: &PatternStore, context: &Context) -> SignalDistribution {
    let mut votes = MoodScores::default();
    let mut total_vote = 0.0f32;
    let mut matched = 0usize;
    for pattern in patterns.matching(context) {
        let vote = pattern.strength();
        votes.add(pattern.mood, vote);
        total_vote += vote;
        matched += 1;
    }
    if matched == 0 {
        return SignalDistribution::uniform();
    }
    SignalDistribution {
        scores: votes.normalized(),
        confidence: (total_vote / matched as f32).clamp(0.0, 1.0),
        evidence: matched,
    }
}

/// History signal: similar records contribute `similarity × engagement`.
pub fn history_signal(history: &HistoryStore, context: &Context, config: &HistoryConfig) -> SignalDistribution {
    let similar = history.find_similar(context, config.similarity_threshold, config.top_k);
    if similar.len() < config.min_similar.max(1) {
        return SignalDistribution::uniform();
    }

    let mut scores = MoodScores::default();
    let mut similarity_sum = 0.0f32;
    for m in &similar {
        scores.add(m.record.mood, m.similarity * m.record.outcome.engagement);
        similarity_sum += m.similarity;
    }
    let n = similar.len() as f32;
    let coverage = (n / config.top_k.max(1) as f32).min(1.0);
    SignalDistribution {
        scores: scores.normalized(),
        confidence: (similarity_sum / n * coverage).clamp(0.0, 1.0),
        evidence: similar.len(),
    }
}

/// Fixed time-of-day and day-type nudges over a uniform base.
pub fn temporal_distribution(environment: &Environment) -> MoodScores {
    let mut scores = MoodScores::uniform();
    match environment.time_of_day {
        TimeOfDay::Morning => {
            scores.add(Mood::Peaceful, 0.15);
            scores.add(Mood::Contemplative, 0.10);
        }
        TimeOfDay::Afternoon => {
            scores.add(Mood::Social, 0.10);
            scores.add(Mood::Energetic, 0.05);
        }
        TimeOfDay::Evening => {
            scores.add(Mood::Energetic, 0.15);
            scores.add(Mood::Social, 0.10);
        }
        TimeOfDay::Night => {
            scores.add(Mood::Mysterious, 0.15);
            scores.add(Mood::Contemplative, 0.05);
        }
    }
    if environment.day_type == DayType::Weekend {
        scores.add(Mood::Social, 0.05);
        scores.add(Mood::Energetic, 0.05);
    }
    scores.normalized()
}

pub fn temporal_signal(environment: &Environment) -> SignalDistribution {
    SignalDistribution::certain(temporal_distribution(environment))
}

/// Weighted average of the four signals, clamped to [0, 1].
pub fn combine(
    neural: &SignalDistribution,
    pattern: &SignalDistribution,
    history: &SignalDistribution,
    temporal: &SignalDistribution,
    config: &DecisionConfig,
) -> (MoodScores, SignalWeights) {
    let weights = SignalWeights {
        neural: config.neural_weight,
        pattern: config.pattern_weight * pattern.confidence,
        history: config.history_weight * history.confidence,
        temporal: config.temporal_weight,
    };
    let total = weights.total();
    if total <= f32::EPSILON {
        return (MoodScores::uniform(), weights);
    }

    let mut combined = MoodScores::default();
    for mood in Mood::ALL {
        let sum = weights.neural * neural.scores.get(mood)
            + weights.pattern * pattern.scores.get(mood)
            + weights.history * history.scores.get(mood)
            + weights.temporal * temporal.scores.get(mood);
        let value = sum / total;
        combined.set(mood, if value.is_finite() { value.clamp(0.0, 1.0) } else { 0.0 });
    }
    (combined, weights)
}

// ─── Prediction ──────────────────────────────────────

/// A ranked runner-up with a one-line rationale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeMood {
    pub mood: Mood,
    pub probability: f32,
    pub rationale: String,
}

/// Forecast audience response, all in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpectedOutcome {
    pub engagement: f32,
    pub audience_retention: f32,
    pub energy_level: f32,
}

/// Abstract "apply this mood" command for show-control dispatchers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoodIntent {
    pub mood: Mood,
    pub parameters: MoodParameters,
    pub issued_at: DateTime<Utc>,
}

/// Full recommendation for one context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodPrediction {
    pub recommended_mood: Mood,
    pub confidence: f32,
    /// Same value as `confidence`.
    pub probability: f32,
    pub alternatives: Vec<AlternativeMood>,
    /// Human-readable reasons. Never empty.
    pub reasoning: Vec<String>,
    pub predicted_duration_secs: f32,
    pub expected_outcome: ExpectedOutcome,
    pub parameters: MoodParameters,
    pub signals: SignalBreakdown,
    pub generated_at: DateTime<Utc>,
}

impl MoodPrediction {
    pub fn intent(&self) -> MoodIntent {
        MoodIntent {
            mood: self.recommended_mood,
            parameters: self.parameters,
            issued_at: Utc::now(),
        }
    }
}

/// Rank the combined scores and assemble the prediction.
pub fn decide(
    context: &Context,
    features: &FeatureVector,
    neural: SignalDistribution,
    pattern: SignalDistribution,
    history_signal: SignalDistribution,
    history: &HistoryStore,
    config: &DecisionConfig,
) -> MoodPrediction {
    let temporal = temporal_signal(&context.environment);
    let (combined, weights) = combine(&neural, &pattern, &history_signal, &temporal, config);

    let ranked = combined.ranked();
    let (recommended, confidence) = ranked[0];

    let alternatives = ranked
        .iter()
        .skip(1)
        .take(2)
        .map(|&(mood, probability)| AlternativeMood {
            mood,
            probability,
            rationale: alternative_rationale(mood, context, features),
        })
        .collect();

    let signals = SignalBreakdown {
        neural,
        pattern,
        history: history_signal,
        temporal,
        weights,
        combined,
    };
    let reasoning = reasoning(context, recommended, &signals);
    let (expected_outcome, predicted_duration_secs) = forecast(recommended, features, history, config);

    MoodPrediction {
        recommended_mood: recommended,
        confidence,
        probability: confidence,
        alternatives,
        reasoning,
        predicted_duration_secs,
        expected_outcome,
        parameters: mood_parameters(recommended, features),
        signals,
        generated_at: Utc::now(),
    }
}

/// Why a runner-up could also work, keyed to its own distinguishing feature.
pub fn alternative_rationale(mood: Mood, context: &Context, features: &FeatureVector) -> String {
    let pct = |v: f32| (v.clamp(0.0, 1.0) * 100.0).round();
    match mood {
        Mood::Energetic => format!(
            "Movement at {}% could carry a more energetic mood",
            pct(context.movement())
        ),
        Mood::Social => format!(
            "Conversation level at {}% leaves room for a social mood",
            pct(context.conversational())
        ),
        Mood::Contemplative => format!(
            "Quiet activity index of {:.2} suits a contemplative mood",
            features.quiet_activity()
        ),
        Mood::Mysterious => {
            let noise = context.audio.as_ref().map_or(0.0, |a| a.ambient_noise);
            format!(
                "{} setting with ambient noise at {}% suits a mysterious mood",
                capitalize(context.environment.time_of_day.name()),
                pct(noise)
            )
        }
        Mood::Peaceful => format!(
            "Audio energy at {}% would allow a peaceful mood",
            pct(context.audio_energy())
        ),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Templated explanations. Falls back to one generic sentence.
pub fn reasoning(context: &Context, recommended: Mood, signals: &SignalBreakdown) -> Vec<String> {
    let mut reasons = Vec::new();

    let people = context.people_count();
    if people > 15 {
        reasons.push(format!("Crowd of {people} people supports a livelier atmosphere"));
    }
    let movement = context.movement();
    if movement > 0.6 {
        reasons.push(format!("High movement ({:.0}%) signals an active audience", movement * 100.0));
    }
    if context.conversational() > 0.6 {
        reasons.push("Conversation dominates the soundscape".to_string());
    }
    if context.musical() > 0.6 {
        reasons.push("Music is prominent in the room audio".to_string());
    }
    if context.audio.is_some() && context.audio_energy() < 0.2 {
        reasons.push("The room is quiet".to_string());
    }
    if signals.temporal.scores.best().0 == recommended {
        reasons.push(format!(
            "{} on a {} typically favours {}",
            capitalize(context.environment.time_of_day.name()),
            context.environment.day_type.name(),
            recommended
        ));
    }
    if signals.pattern.evidence > 0 {
        reasons.push(format!("{} learned pattern(s) match this context", signals.pattern.evidence));
    }
    if signals.history.evidence > 0 {
        reasons.push(format!(
            "{} similar past situation(s) inform this choice",
            signals.history.evidence
        ));
    }

    if reasons.is_empty() {
        reasons.push(format!("Balanced signals; {recommended} scored highest overall"));
    }
    reasons
}

/// Expected outcome and duration for `mood`, from its history or defaults.
///
/// Retention is `0.5 + mean audience growth`, clamped to [0, 1]: a steady
/// audience maps to 0.5, +50% or more saturates at 1, and a halved audience
/// maps to 0.
pub fn forecast(
    mood: Mood,
    features: &FeatureVector,
    history: &HistoryStore,
    config: &DecisionConfig,
) -> (ExpectedOutcome, f32) {
    let energy_level = (0.5 * mood.profile().energy + 0.5 * features.energy()).clamp(0.0, 1.0);
    match history.performance(mood) {
        Some(perf) => (
            ExpectedOutcome {
                engagement: perf.average_engagement.clamp(0.0, 1.0),
                audience_retention: (0.5 + perf.average_audience_growth).clamp(0.0, 1.0),
                energy_level,
            },
            perf.average_duration_secs,
        ),
        None => (
            ExpectedOutcome {
                engagement: config.default_engagement.clamp(0.0, 1.0),
                audience_retention: config.default_retention.clamp(0.0, 1.0),
                energy_level,
            },
            config.default_duration_secs,
        ),
    }
}

/// Profile parameters nudged toward the live context.
pub fn mood_parameters(mood: Mood, features: &FeatureVector) -> MoodParameters {
    let profile = mood.profile();
    let live = 1.0 - PROFILE_SHARE;
    MoodParameters {
        energy: PROFILE_SHARE * profile.energy + live * features.energy(),
        valence: PROFILE_SHARE * profile.valence + live * features.social(),
        arousal: PROFILE_SHARE * profile.arousal + live * features.energy(),
    }
    .clamped()
}

// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! End-to-end scenarios for the mood engine.
//!
//! Each test drives a full `MoodEngine` through its public API:
//! 1. Totality over sensor/time combinations
//! 2. Uniform fallbacks with empty stores
//! 3. Bounded stores under sustained feedback
//! 4. Crowded evening scenario, untrained and pre-trained
//! 5. Rejection of unknown moods
//! 6. A/B test lifecycle
//! 7. State export/import across engines
//! 8. Feedback shifting the recommendation
//!
//! Run with: `cargo test -p ambient-core --test engine_scenarios`

use ambient_core::config::HistoryConfig;
use ambient_core::mood::MoodScores;
use ambient_core::predictor::MoodLearner;
use ambient_core::{
    AudioFeatures, Context, DayType, EngineConfig, Environment, Mood, MoodEngine, MoodError, Outcome, TimeOfDay,
    VisionFeatures,
};
use chrono::{Duration, TimeZone, Utc};

fn seeded(seed: u64) -> MoodEngine {
    MoodEngine::new(EngineConfig::default().with_seed(seed))
}

fn crowded_evening() -> Context {
    Context::new(Environment::new(TimeOfDay::Evening, DayType::Weekday))
        .with_vision(VisionFeatures::new(30, 0.85))
        .with_audio(AudioFeatures::new(0.9, 0.3, 0.8))
}

// ═══════════════════════════════════════════════════════════
// Totality and fallbacks
// ═══════════════════════════════════════════════════════════

#[test]
fn test_every_context_yields_a_mood() {
    let engine = seeded(1);
    let times = [TimeOfDay::Morning, TimeOfDay::Afternoon, TimeOfDay::Evening, TimeOfDay::Night];
    let days = [DayType::Weekday, DayType::Weekend];

    for &time in &times {
        for &day in &days {
            let base = Context::new(Environment::new(time, day));
            let variants = [
                base.clone(),
                base.clone().with_vision(VisionFeatures::new(0, 0.0)),
                base.clone().with_audio(AudioFeatures::new(1.0, 1.0, 1.0)),
                base.clone()
                    .with_vision(VisionFeatures::new(500, 1.0))
                    .with_audio(AudioFeatures::new(0.0, 0.0, 0.0)),
            ];
            for ctx in &variants {
                let p = engine.predict_optimal_mood(ctx);
                assert!(Mood::ALL.contains(&p.recommended_mood));
                assert!((0.0..=1.0).contains(&p.confidence), "confidence {}", p.confidence);
                assert_eq!(p.confidence, p.probability);
                assert!(!p.reasoning.is_empty());
                assert_eq!(p.alternatives.len(), 2);
                for alt in &p.alternatives {
                    assert_ne!(alt.mood, p.recommended_mood);
                    assert!(alt.probability <= p.probability);
                }
                let e = p.expected_outcome;
                for v in [e.engagement, e.audience_retention, e.energy_level] {
                    assert!((0.0..=1.0).contains(&v));
                }
            }
        }
    }
}

#[test]
fn test_empty_stores_fall_back_to_uniform() {
    let engine = seeded(2);
    let ctx = crowded_evening();
    let pattern = engine.pattern_distribution(&ctx);
    let history = engine.history_distribution(&ctx);
    assert_eq!(pattern.scores, MoodScores::uniform());
    assert_eq!(history.scores, MoodScores::uniform());
    for mood in Mood::ALL {
        assert_eq!(pattern.scores.get(mood), 0.2);
        assert_eq!(history.scores.get(mood), 0.2);
    }
    assert_eq!(pattern.confidence, 0.0);
    assert_eq!(history.confidence, 0.0);
}

// ═══════════════════════════════════════════════════════════
// Bounded stores
// ═══════════════════════════════════════════════════════════

#[test]
fn test_history_keeps_most_recent_records() {
    let cap = 100;
    let mut engine = MoodEngine::new(EngineConfig {
        history: HistoryConfig {
            capacity: cap,
            ..HistoryConfig::default()
        },
        ..EngineConfig::default()
    });
    let base = Utc.with_ymd_and_hms(2026, 3, 14, 18, 0, 0).unwrap();
    let env = Environment::new(TimeOfDay::Evening, DayType::Weekday);

    for i in 0..(cap as i64 + 50) {
        let ctx = Context::at(base + Duration::seconds(i), env.clone())
            .with_vision(VisionFeatures::new((i % 40) as u32, 0.5));
        let mood = Mood::ALL[i as usize % Mood::ALL.len()];
        engine
            .record_mood_outcome(&ctx, mood, Outcome::new(0.95, 60.0))
            .unwrap();
    }

    assert_eq!(engine.history().len(), cap);
    let stamps: Vec<_> = engine.history().iter().map(|r| r.context.timestamp).collect();
    assert_eq!(stamps[0], base + Duration::seconds(50));
    assert_eq!(stamps[cap - 1], base + Duration::seconds(149));
    assert!(stamps.windows(2).all(|w| w[0] < w[1]));

    assert!(engine.patterns().len() <= engine.patterns().capacity());
    assert_eq!(engine.stats().training_steps, 150);
}

// ═══════════════════════════════════════════════════════════
// Scenario
// ═══════════════════════════════════════════════════════════

#[test]
fn test_untrained_engine_leans_on_evening_prior() {
    let engine = seeded(2024);
    let ctx = crowded_evening();
    assert!(engine.patterns().is_empty());
    assert!(engine.history().is_empty());

    let p = engine.predict_optimal_mood(&ctx);
    assert_eq!(p.signals.temporal.scores.best().0, Mood::Energetic);
    assert_eq!(p.signals.weights.pattern, 0.0);
    assert_eq!(p.signals.weights.history, 0.0);

    // Neural and temporal both sum to 1 and the evening prior is skewed,
    // so the combined scores cannot be flat.
    let total: f32 = Mood::ALL.iter().map(|&m| p.signals.combined.get(m)).sum();
    assert!((total - 1.0).abs() < 1e-4);
    assert!(p.confidence > 0.2, "confidence {}", p.confidence);

    // The temporal share alone guarantees Energetic a floor.
    let w = p.signals.weights;
    let floor = w.temporal * p.signals.temporal.scores.get(Mood::Energetic) / (w.neural + w.temporal);
    assert!(p.signals.combined.get(Mood::Energetic) >= floor - 1e-6);
}

#[test]
fn test_pretrained_predictor_picks_energetic_on_crowded_evening() {
    let mut engine = seeded(2024);
    let ctx = crowded_evening();
    let features = engine.features(&ctx);

    let mut target = MoodScores::splat(0.05);
    target.set(Mood::Energetic, 1.0);
    for _ in 0..5000 {
        engine.predictor_mut().train(&features, &target);
    }

    assert!(engine.patterns().is_empty());
    assert!(engine.history().is_empty());

    let p = engine.predict_optimal_mood(&ctx);
    assert_eq!(p.recommended_mood, Mood::Energetic);
    assert!(p.confidence > 0.2, "confidence {}", p.confidence);
    assert_eq!(p.signals.weights.pattern, 0.0);
    assert_eq!(p.signals.weights.history, 0.0);
    assert!(p.reasoning.iter().any(|r| r.contains("Crowd of 30")));
    assert!(p.reasoning.iter().any(|r| r.contains("movement")));
    assert!(p.parameters.energy > Mood::Peaceful.profile().energy);
}

// ═══════════════════════════════════════════════════════════
// Validation
// ═══════════════════════════════════════════════════════════

#[test]
fn test_unknown_mood_leaves_engine_untouched() {
    let mut engine = seeded(3);
    let ctx = crowded_evening();
    engine.record_outcome(&ctx, "Social", Outcome::new(0.95, 90.0)).unwrap();
    let before = engine.export_state();
    let weights = engine.predictor().output_weights().to_vec();

    let err = engine.record_outcome(&ctx, "Bogus", Outcome::new(0.95, 90.0)).unwrap_err();
    assert!(matches!(err, MoodError::UnknownMood { ref name } if name == "Bogus"));

    assert_eq!(engine.export_state(), before);
    assert_eq!(engine.predictor().output_weights(), weights.as_slice());
    assert_eq!(engine.stats().training_steps, 1);

    assert!(matches!(
        engine.start_ab_test("Bogus", "Social", "x"),
        Err(MoodError::UnknownMood { .. })
    ));
    assert!(engine.active_ab_test().is_none());
}

// ═══════════════════════════════════════════════════════════
// A/B testing
// ═══════════════════════════════════════════════════════════

#[test]
fn test_ab_lifecycle() {
    let mut engine = seeded(4);
    let id = engine.start_ab_test("Energetic", "Social", "saturday-night").unwrap();

    let mut completed = None;
    for _ in 0..30 {
        completed = completed.or(engine.record_ab_result(id, "Energetic", 0.9).unwrap());
    }
    for _ in 0..20 {
        completed = completed.or(engine.record_ab_result(id, "Social", 0.5).unwrap());
    }

    let result = completed.expect("test completes at 50 samples");
    assert_eq!(result.winner, Mood::Energetic);
    assert!(result.confidence > 0.0);
    assert_eq!(result.sample_size, 50);
    assert_eq!(engine.ab_test_history().len(), 1);

    assert!(engine.record_ab_result(id, "Energetic", 0.9).unwrap().is_none());
    assert_eq!(engine.ab_test_history().len(), 1);
    assert!(engine.active_ab_test().is_none());
}

// ═══════════════════════════════════════════════════════════
// Persistence
// ═══════════════════════════════════════════════════════════

#[test]
fn test_state_transfers_between_engines() {
    let mut source = seeded(5);
    let ctx = crowded_evening();
    for i in 0..12 {
        let engagement = 0.5 + (i as f32) * 0.04;
        source.record_outcome(&ctx, "Energetic", Outcome::new(engagement, 200.0)).unwrap();
    }
    let id = source.start_ab_test("Energetic", "Mysterious", "gala").unwrap();
    source.record_ab_result(id, "Mysterious", 0.3).unwrap();
    source.complete_ab_test();

    let json = source.export_json().unwrap();
    let mut target = seeded(6);
    target.import_json(&json).unwrap();

    assert_eq!(target.history().len(), 12);
    assert_eq!(target.patterns().len(), source.patterns().len());
    assert_eq!(target.ab_test_history().len(), 1);
    assert_eq!(target.stats().per_mood[&Mood::Energetic].samples, 12);

    // Imported history feeds decisions immediately.
    assert!(target.history_distribution(&ctx).confidence > 0.0);
}

// ═══════════════════════════════════════════════════════════
// Learning
// ═══════════════════════════════════════════════════════════

#[test]
fn test_feedback_raises_applied_mood() {
    let mut engine = seeded(7);
    let ctx = Context::new(Environment::new(TimeOfDay::Morning, DayType::Weekday))
        .with_vision(VisionFeatures::new(4, 0.1))
        .with_audio(AudioFeatures::new(0.1, 0.1, 0.2));

    let before = engine.predict_optimal_mood(&ctx).signals.combined.get(Mood::Peaceful);
    for _ in 0..20 {
        engine.record_outcome(&ctx, "Peaceful", Outcome::new(1.0, 600.0)).unwrap();
    }
    let after = engine.predict_optimal_mood(&ctx);

    assert!(after.signals.combined.get(Mood::Peaceful) > before);
    assert_eq!(engine.pattern_distribution(&ctx).scores.best().0, Mood::Peaceful);
    assert_eq!(engine.history_distribution(&ctx).scores.best().0, Mood::Peaceful);
    assert!(after.signals.weights.history > 0.0);
}

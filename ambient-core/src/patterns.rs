// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Pattern store — learned condition → mood rules with tracked success rates.
//!
//! A pattern fires when every one of its conditions holds against a context
//! (AND semantics). Each time a firing pattern's mood is applied, its success
//! rate is smoothed toward the observed engagement. High-engagement outcomes
//! in uncovered contexts synthesize new patterns; the store is pruned back to
//! capacity by success rate, then recency.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::PatternConfig;
use crate::context::{Context, FieldValue};
use crate::error::{MoodError, Result};
use crate::mood::Mood;

/// Comparison applied to a resolved context field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum Comparison {
    GreaterThan(f32),
    LessThan(f32),
    Equals(FieldValue),
    InRange { min: f32, max: f32 },
    /// Substring match on text, or on any element of a list.
    Contains(String),
}

/// One comparison against a dotted context path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub comparison: Comparison,
}

impl Condition {
    pub fn new<S: Into<String>>(field: S, comparison: Comparison) -> Self {
        Self {
            field: field.into(),
            comparison,
        }
    }

    pub fn greater_than<S: Into<String>>(field: S, value: f32) -> Self {
        Self::new(field, Comparison::GreaterThan(value))
    }

    pub fn less_than<S: Into<String>>(field: S, value: f32) -> Self {
        Self::new(field, Comparison::LessThan(value))
    }

    pub fn equals<S: Into<String>, V: Into<FieldValue>>(field: S, value: V) -> Self {
        Self::new(field, Comparison::Equals(value.into()))
    }

    pub fn in_range<S: Into<String>>(field: S, min: f32, max: f32) -> Self {
        Self::new(field, Comparison::InRange { min, max })
    }

    pub fn contains<S: Into<String>, T: Into<String>>(field: S, needle: T) -> Self {
        Self::new(field, Comparison::Contains(needle.into()))
    }

    /// Whether the condition holds. Unknown or absent fields never hold.
    pub fn holds(&self, context: &Context) -> bool {
        let Some(value) = context.field(&self.field) else {
            return false;
        };
        match (&self.comparison, &value) {
            (Comparison::GreaterThan(t), FieldValue::Number(n)) => n > t,
            (Comparison::LessThan(t), FieldValue::Number(n)) => n < t,
            (Comparison::InRange { min, max }, FieldValue::Number(n)) => (*min..=*max).contains(n),
            (Comparison::Equals(FieldValue::Number(t)), FieldValue::Number(n)) => (n - t).abs() < 1e-6,
            (Comparison::Equals(FieldValue::Text(t)), FieldValue::Text(s)) => s.eq_ignore_ascii_case(t),
            (Comparison::Equals(expected), actual) => expected == actual,
            (Comparison::Contains(needle), FieldValue::Text(s)) => {
                s.to_lowercase().contains(&needle.to_lowercase())
            }
            (Comparison::Contains(needle), FieldValue::List(items)) => {
                let needle = needle.to_lowercase();
                items.iter().any(|item| item.to_lowercase().contains(&needle))
            }
            _ => false,
        }
    }
}

/// A condition → mood rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: Uuid,
    pub conditions: Vec<Condition>,
    pub mood: Mood,
    /// Prior confidence in the rule [0, 1].
    pub confidence: f32,
    /// EMA of engagement observed while the rule fired [0, 1].
    pub success_rate: f32,
    /// Times the rule has been reinforced.
    pub activations: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Pattern {
    pub fn new(mood: Mood, conditions: Vec<Condition>, confidence: f32) -> Self {
        let now = Utc::now();
        let confidence = confidence.clamp(0.0, 1.0);
        Self {
            id: Uuid::new_v4(),
            conditions,
            mood,
            confidence,
            success_rate: confidence,
            activations: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_success_rate(mut self, rate: f32) -> Self {
        self.success_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Reject rules whose scores fall outside [0, 1] (including NaN).
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("confidence", self.confidence), ("success_rate", self.success_rate)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(MoodError::invalid_pattern(format!(
                    "pattern {}: {name} {value} outside [0, 1]",
                    self.id
                )));
            }
        }
        Ok(())
    }

    /// All conditions hold. A rule without conditions matches everything.
    pub fn matches(&self, context: &Context) -> bool {
        self.conditions.iter().all(|c| c.holds(context))
    }

    /// Vote weight used by the decision engine.
    pub fn strength(&self) -> f32 {
        self.success_rate * self.confidence
    }

    /// Smooth the success rate toward `engagement`.
    pub fn reinforce(&mut self, engagement: f32, smoothing: f32) {
        self.success_rate += smoothing * (engagement - self.success_rate);
        self.success_rate = self.success_rate.clamp(0.0, 1.0);
        self.activations += 1;
        self.updated_at = Utc::now();
    }

    /// Human-readable summary, e.g. `"environment.time_of_day = evening → Energetic"`.
    pub fn describe(&self) -> String {
        let parts: Vec<String> = self
            .conditions
            .iter()
            .map(|c| match &c.comparison {
                Comparison::GreaterThan(v) => format!("{} > {}", c.field, v),
                Comparison::LessThan(v) => format!("{} < {}", c.field, v),
                Comparison::Equals(FieldValue::Number(v)) => format!("{} = {}", c.field, v),
                Comparison::Equals(FieldValue::Text(v)) => format!("{} = {}", c.field, v),
                Comparison::Equals(FieldValue::List(v)) => format!("{} = [{}]", c.field, v.join(", ")),
                Comparison::InRange { min, max } => format!("{} in [{}, {}]", c.field, min, max),
                Comparison::Contains(v) => format!("{} contains '{}'", c.field, v),
            })
            .collect();
        let lhs = if parts.is_empty() { "always".to_string() } else { parts.join(" and ") };
        format!("{lhs} → {}", self.mood)
    }
}

/// Result of one `PatternStore::update`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatternUpdate {
    /// Existing patterns whose success rate moved.
    pub reinforced: usize,
    /// Id of a newly synthesized pattern.
    pub created: Option<Uuid>,
    /// Patterns removed by pruning.
    pub pruned: usize,
}

/// Built-in starter rules for new venues.
pub fn seed_patterns() -> Vec<Pattern> {
    vec![
        Pattern::new(
            Mood::Energetic,
            vec![
                Condition::equals("environment.time_of_day", "evening"),
                Condition::greater_than("vision.people_count", 15.0),
            ],
            0.7,
        ),
        Pattern::new(
            Mood::Peaceful,
            vec![
                Condition::equals("environment.time_of_day", "morning"),
                Condition::less_than("audio.energy", 0.3),
            ],
            0.6,
        ),
        Pattern::new(
            Mood::Social,
            vec![Condition::greater_than("audio.conversational", 0.6)],
            0.6,
        ),
        Pattern::new(
            Mood::Mysterious,
            vec![
                Condition::equals("environment.time_of_day", "night"),
                Condition::less_than("vision.avg_movement", 0.3),
            ],
            0.5,
        ),
        Pattern::new(
            Mood::Contemplative,
            vec![
                Condition::less_than("vision.people_count", 5.0),
                Condition::less_than("audio.energy", 0.3),
            ],
            0.5,
        ),
    ]
}

/// Growable, capacity-pruned set of patterns.
#[derive(Debug, Clone)]
pub struct PatternStore {
    patterns: Vec<Pattern>,
    config: PatternConfig,
}

impl PatternStore {
    pub fn new(config: PatternConfig) -> Self {
        let seed = config.seed_defaults;
        let store = Self {
            patterns: Vec::new(),
            config,
        };
        if seed {
            store.with_seed_patterns()
        } else {
            store
        }
    }

    /// Add the built-in starter rules.
    pub fn with_seed_patterns(mut self) -> Self {
        for pattern in seed_patterns() {
            self.insert(pattern);
        }
        self
    }

    /// Patterns whose conditions all hold for `context`.
    pub fn matching<'a>(&'a self, context: &'a Context) -> impl Iterator<Item = &'a Pattern> + 'a {
        self.patterns.iter().filter(move |p| p.matches(context))
    }

    /// Add a pattern, pruning if the store is over capacity.
    pub fn insert(&mut self, pattern: Pattern) -> usize {
        self.patterns.push(pattern);
        self.prune()
    }

    /// Learn from one applied mood.
    ///
    /// Reinforces every matching pattern for `mood`; if none exists and the
    /// engagement clears the creation threshold, synthesizes a new one.
    pub fn update(&mut self, context: &Context, mood: Mood, engagement: f32) -> PatternUpdate {
        let engagement = engagement.clamp(0.0, 1.0);
        let smoothing = self.config.smoothing;
        let mut result = PatternUpdate::default();

        for pattern in self
            .patterns
            .iter_mut()
            .filter(|p| p.mood == mood && p.matches(context))
        {
            pattern.reinforce(engagement, smoothing);
            result.reinforced += 1;
        }

        if result.reinforced == 0 && engagement > self.config.creation_threshold {
            let pattern = Pattern::new(mood, salient_conditions(context), self.config.initial_confidence)
                .with_success_rate(engagement);
            info!(
                pattern = %pattern.id,
                rule = %pattern.describe(),
                engagement,
                "pattern created"
            );
            result.created = Some(pattern.id);
            self.patterns.push(pattern);
        }

        result.pruned = self.prune();
        result
    }

    /// Keep the best `capacity` patterns by success rate, then recency.
    /// Returns how many were removed.
    pub fn prune(&mut self) -> usize {
        let capacity = self.config.capacity;
        if self.patterns.len() <= capacity {
            return 0;
        }
        self.patterns.sort_by(|a, b| {
            b.success_rate
                .partial_cmp(&a.success_rate)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.updated_at.cmp(&a.updated_at))
        });
        let removed = self.patterns.len() - capacity;
        self.patterns.truncate(capacity);
        debug!(removed, capacity, "patterns pruned");
        removed
    }

    /// Replace all patterns (e.g. on import), pruning to capacity.
    pub fn replace(&mut self, patterns: Vec<Pattern>) -> usize {
        self.patterns = patterns;
        self.prune()
    }

    pub fn get(&self, id: Uuid) -> Option<&Pattern> {
        self.patterns.iter().find(|p| p.id == id)
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }
}

/// Conditions describing what stood out in `context`: extreme crowd size,
/// extreme audio energy, and always the current time bucket.
fn salient_conditions(context: &Context) -> Vec<Condition> {
    let mut conditions = Vec::new();

    if let Some(vision) = &context.vision {
        if vision.people_count > 20 {
            conditions.push(Condition::greater_than("vision.people_count", 20.0));
        } else if vision.people_count < 5 {
            conditions.push(Condition::less_than("vision.people_count", 5.0));
        }
    }

    if let Some(audio) = &context.audio {
        if audio.energy > 0.7 {
            conditions.push(Condition::greater_than("audio.energy", 0.6));
        } else if audio.energy < 0.3 {
            conditions.push(Condition::less_than("audio.energy", 0.4));
        }
    }

    conditions.push(Condition::equals(
        "environment.time_of_day",
        context.environment.time_of_day.name(),
    ));
    conditions
}

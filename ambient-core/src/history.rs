// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Capacity-bounded log of (context, mood, outcome) records with
//! similarity-based retrieval.
//!
//! The log is a ring: once full, each append evicts the oldest record.
//! Retrieval ranks stored contexts by a weighted per-channel closeness.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::context::Context;
use crate::error::{MoodError, Result};
use crate::mood::Mood;

/// People-count difference that counts as completely dissimilar.
const PEOPLE_SCALE: f32 = 50.0;

const VISION_WEIGHT: f32 = 0.4;
const AUDIO_WEIGHT: f32 = 0.3;
const ENVIRONMENT_WEIGHT: f32 = 0.3;

/// Observed audience response to an applied mood.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Engagement [0, 1].
    pub engagement: f32,
    /// How long the mood was held, in seconds (> 0).
    pub duration_secs: f32,
    /// Fractional change in audience size while the mood was held, e.g.
    /// `0.1` for +10%. Never below `-1.0` (everyone left).
    pub audience_growth: f32,
    /// Explicit feedback score [0, 1].
    pub feedback: f32,
}

impl Outcome {
    pub fn new(engagement: f32, duration_secs: f32) -> Self {
        Self {
            engagement,
            duration_secs,
            audience_growth: 0.0,
            feedback: engagement,
        }
    }

    /// Reject out-of-range or non-finite values.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.engagement) {
            return Err(MoodError::invalid_outcome(format!(
                "engagement {} out of range [0, 1]",
                self.engagement
            )));
        }
        if !(self.duration_secs.is_finite() && self.duration_secs > 0.0) {
            return Err(MoodError::invalid_outcome(format!(
                "duration {}s must be positive",
                self.duration_secs
            )));
        }
        if !(self.audience_growth.is_finite() && self.audience_growth >= -1.0) {
            return Err(MoodError::invalid_outcome(format!(
                "audience growth {} must be a finite fraction >= -1",
                self.audience_growth
            )));
        }
        if !(0.0..=1.0).contains(&self.feedback) {
            return Err(MoodError::invalid_outcome(format!(
                "feedback {} out of range [0, 1]",
                self.feedback
            )));
        }
        Ok(())
    }
}

/// One closed feedback loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningRecord {
    pub id: Uuid,
    pub context: Context,
    pub mood: Mood,
    pub outcome: Outcome,
    pub recorded_at: DateTime<Utc>,
}

impl LearningRecord {
    pub fn new(context: Context, mood: Mood, outcome: Outcome) -> Self {
        Self {
            id: Uuid::new_v4(),
            context,
            mood,
            outcome,
            recorded_at: Utc::now(),
        }
    }

    pub fn with_recorded_at(mut self, at: DateTime<Utc>) -> Self {
        self.recorded_at = at;
        self
    }
}

fn closeness(a: f32, b: f32) -> f32 {
    (1.0 - (a - b).abs()).max(0.0)
}

/// Weighted similarity of two contexts in [0, 1].
///
/// Vision (people count, movement) weighs 0.4, audio (energy, volume) 0.3,
/// environment (time bucket, day type) 0.3. A channel missing on either side
/// is left out and the result is renormalized over the channels used.
pub fn similarity(a: &Context, b: &Context) -> f32 {
    let mut score = 0.0f32;
    let mut weight = 0.0f32;

    if let (Some(va), Some(vb)) = (&a.vision, &b.vision) {
        let people_delta = (va.people_count as f32 - vb.people_count as f32).abs() / PEOPLE_SCALE;
        let people = (1.0 - people_delta).max(0.0);
        let movement = closeness(va.avg_movement, vb.avg_movement);
        score += VISION_WEIGHT * (people + movement) / 2.0;
        weight += VISION_WEIGHT;
    }

    if let (Some(aa), Some(ab)) = (&a.audio, &b.audio) {
        let energy = closeness(aa.energy, ab.energy);
        let volume = closeness(aa.volume, ab.volume);
        score += AUDIO_WEIGHT * (energy + volume) / 2.0;
        weight += AUDIO_WEIGHT;
    }

    let ea = &a.environment;
    let eb = &b.environment;
    let time_match = if ea.time_of_day == eb.time_of_day { 1.0 } else { 0.0 };
    let day_match = if ea.day_type == eb.day_type { 1.0 } else { 0.0 };
    score += ENVIRONMENT_WEIGHT * (time_match + day_match) / 2.0;
    weight += ENVIRONMENT_WEIGHT;

    (score / weight).clamp(0.0, 1.0)
}

/// A stored record paired with its similarity to a query.
#[derive(Debug, Clone, Copy)]
pub struct SimilarRecord<'a> {
    pub record: &'a LearningRecord,
    pub similarity: f32,
}

/// Aggregated outcomes for one mood.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoodPerformance {
    pub samples: usize,
    pub average_engagement: f32,
    pub average_duration_secs: f32,
    pub average_audience_growth: f32,
    pub average_feedback: f32,
}

/// Capacity-bounded outcome log.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    records: VecDeque<LearningRecord>,
    capacity: usize,
}

impl HistoryStore {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Append a record, returning the evicted oldest record if over capacity.
    pub fn append(&mut self, record: LearningRecord) -> Option<LearningRecord> {
        let evicted = if self.records.len() >= self.capacity {
            self.records.pop_front()
        } else {
            None
        };
        self.records.push_back(record);
        evicted
    }

    /// Replace the log, keeping the newest `capacity` records in given order.
    /// Returns how many were dropped.
    pub fn replace(&mut self, records: Vec<LearningRecord>) -> usize {
        let dropped = records.len().saturating_sub(self.capacity);
        self.records = records.into_iter().skip(dropped).collect();
        dropped
    }

    /// Up to `limit` records with similarity ≥ `threshold`, most similar first.
    pub fn find_similar(&self, context: &Context, threshold: f32, limit: usize) -> Vec<SimilarRecord<'_>> {
        let mut matches: Vec<SimilarRecord<'_>> = self
            .records
            .iter()
            .map(|record| SimilarRecord {
                record,
                similarity: similarity(context, &record.context),
            })
            .filter(|m| m.similarity >= threshold)
            .collect();

        matches.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        matches.truncate(limit);
        matches
    }

    /// Records for one mood, oldest first.
    pub fn records_for(&self, mood: Mood) -> impl Iterator<Item = &LearningRecord> + '_ {
        self.records.iter().filter(move |r| r.mood == mood)
    }

    /// Averaged outcomes for one mood, `None` if it has never been applied.
    pub fn performance(&self, mood: Mood) -> Option<MoodPerformance> {
        let mut samples = 0usize;
        let (mut engagement, mut duration, mut growth, mut feedback) = (0.0f32, 0.0f32, 0.0f32, 0.0f32);
        for r in self.records_for(mood) {
            samples += 1;
            engagement += r.outcome.engagement;
            duration += r.outcome.duration_secs;
            growth += r.outcome.audience_growth;
            feedback += r.outcome.feedback;
        }
        if samples == 0 {
            return None;
        }
        let n = samples as f32;
        Some(MoodPerformance {
            samples,
            average_engagement: engagement / n,
            average_duration_secs: duration / n,
            average_audience_growth: growth / n,
            average_feedback: feedback / n,
        })
    }

    /// Mean engagement over all records.
    pub fn average_engagement(&self) -> Option<f32> {
        if self.records.is_empty() {
            return None;
        }
        let total: f32 = self.records.iter().map(|r| r.outcome.engagement).sum();
        Some(total / self.records.len() as f32)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LearningRecord> + '_ {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn oldest(&self) -> Option<&LearningRecord> {
        self.records.front()
    }

    pub fn newest(&self) -> Option<&LearningRecord> {
        self.records.back()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

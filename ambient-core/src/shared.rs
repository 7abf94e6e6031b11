// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Thread-shareable engine handle.
//!
//! Predictions take the read lock and run concurrently; outcome, pattern,
//! and A/B mutations take the write lock and are serialized.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::ab_test::ABTestResult;
use crate::context::Context;
use crate::decision::MoodPrediction;
use crate::engine::{LearningStats, MoodEngine};
use crate::error::Result;
use crate::history::Outcome;

/// Cloneable handle to one engine.
#[derive(Clone)]
pub struct SharedMoodEngine {
    inner: Arc<RwLock<MoodEngine>>,
}

impl SharedMoodEngine {
    pub fn new(engine: MoodEngine) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    pub fn predict_optimal_mood(&self, context: &Context) -> MoodPrediction {
        self.inner.read().predict_optimal_mood(context)
    }

    pub fn refresh_prediction(&self, context: &Context) -> MoodPrediction {
        self.inner.write().refresh_prediction(context).clone()
    }

    pub fn current_prediction(&self) -> Option<MoodPrediction> {
        self.inner.read().current_prediction().cloned()
    }

    pub fn record_outcome(&self, context: &Context, mood: &str, outcome: Outcome) -> Result<()> {
        self.inner.write().record_outcome(context, mood, outcome)
    }

    pub fn start_ab_test(&self, mood_a: &str, mood_b: &str, context_label: &str) -> Result<Uuid> {
        self.inner.write().start_ab_test(mood_a, mood_b, context_label)
    }

    pub fn record_ab_result(&self, test_id: Uuid, mood: &str, engagement: f32) -> Result<Option<ABTestResult>> {
        self.inner.write().record_ab_result(test_id, mood, engagement)
    }

    pub fn stats(&self) -> LearningStats {
        self.inner.read().stats()
    }

    /// Hold the read lock for several reads against one snapshot.
    pub fn read(&self) -> RwLockReadGuard<'_, MoodEngine> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, MoodEngine> {
        self.inner.write()
    }
}

impl From<MoodEngine> for SharedMoodEngine {
    fn from(engine: MoodEngine) -> Self {
        Self::new(engine)
    }
}

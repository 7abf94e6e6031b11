// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Learned-state export and import.
//!
//! Where the state is stored is up to the host; the engine only converts to
//! and from an `EngineState` value or its JSON form.

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::ab_test::ABTestResult;
use crate::engine::MoodEngine;
use crate::error::{MoodError, Result};
use crate::history::LearningRecord;
use crate::patterns::Pattern;

/// Current `EngineState` format version.
pub const STATE_VERSION: u32 = 1;

/// Everything the engine has learned from outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineState {
    pub version: u32,
    pub history: Vec<LearningRecord>,
    pub patterns: Vec<Pattern>,
    pub ab_history: Vec<ABTestResult>,
}

impl EngineState {
    /// Check the version and every record, pattern and result.
    pub fn validate(&self) -> Result<()> {
        if self.version != STATE_VERSION {
            return Err(MoodError::UnsupportedStateVersion {
                found: self.version,
                expected: STATE_VERSION,
            });
        }
        for record in &self.history {
            record.outcome.validate()?;
        }
        for pattern in &self.patterns {
            pattern.validate()?;
        }
        for result in &self.ab_history {
            result.validate()?;
        }
        Ok(())
    }
}

impl MoodEngine {
    pub fn export_state(&self) -> EngineState {
        EngineState {
            version: STATE_VERSION,
            history: self.history.iter().cloned().collect(),
            patterns: self.patterns.patterns().to_vec(),
            ab_history: self.ab_tests.history().to_vec(),
        }
    }

    /// Replace learned state. Capacity bounds are re-applied; anything over
    /// them is dropped (oldest records and results, weakest patterns).
    ///
    /// Every entry is validated first; on error nothing is changed.
    pub fn import_state(&mut self, state: EngineState) -> Result<()> {
        state.validate()?;

        let dropped_records = self.history.replace(state.history);
        let dropped_patterns = self.patterns.replace(state.patterns);
        let dropped_tests = self.ab_tests.replace_history(state.ab_history);
        self.current = None;

        if dropped_records > 0 || dropped_patterns > 0 || dropped_tests > 0 {
            warn!(dropped_records, dropped_patterns, dropped_tests, "imported state exceeded capacity");
        }
        info!(
            records = self.history.len(),
            patterns = self.patterns.len(),
            tests = self.ab_tests.history().len(),
            "engine state imported"
        );
        Ok(())
    }

    pub fn export_json(&self) -> anyhow::Result<String> {
        serde_json::to_string(&self.export_state()).context("failed to serialize engine state")
    }

    pub fn import_json(&mut self, json: &str) -> anyhow::Result<()> {
        let state: EngineState = serde_json::from_str(json).context("failed to parse engine state")?;
        self.import_state(state).context("failed to import engine state")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EngineConfig, HistoryConfig};
    use crate::context::{Context, DayType, Environment, TimeOfDay, VisionFeatures};
    use crate::history::Outcome;

    fn trained() -> MoodEngine {
        let mut engine = MoodEngine::new(EngineConfig::default().with_seed(3));
        let ctx = Context::new(Environment::new(TimeOfDay::Night, DayType::Weekend))
            .with_vision(VisionFeatures::new(3, 0.1));
        for i in 0..6 {
            let engagement = if i % 2 == 0 { 0.9 } else { 0.4 };
            engine
                .record_outcome(&ctx, "Mysterious", Outcome::new(engagement, 180.0))
                .unwrap();
        }
        let id = engine.start_ab_test("Mysterious", "Peaceful", "late").unwrap();
        engine.record_ab_result(id, "Mysterious", 0.7).unwrap();
        engine.complete_ab_test();
        engine
    }

    #[test]
    fn test_json_roundtrip_preserves_counts() {
        let source = trained();
        let json = source.export_json().unwrap();

        let mut restored = MoodEngine::new(EngineConfig::default().with_seed(3));
        restored.import_json(&json).unwrap();

        assert_eq!(restored.history().len(), source.history().len());
        assert_eq!(restored.patterns().len(), source.patterns().len());
        assert_eq!(restored.ab_test_history().len(), 1);
        let ids = |e: &MoodEngine| e.history().iter().map(|r| r.id).collect::<Vec<_>>();
        assert_eq!(ids(&restored), ids(&source));
        assert_eq!(restored.patterns().patterns()[0].id, source.patterns().patterns()[0].id);
    }

    #[test]
    fn test_import_rejects_unknown_version() {
        let mut engine = trained();
        let mut state = engine.export_state();
        state.version = 99;
        let before = engine.history().len();
        let err = engine.import_state(state).unwrap_err();
        assert_eq!(err, MoodError::UnsupportedStateVersion { found: 99, expected: STATE_VERSION });
        assert_eq!(engine.history().len(), before);
    }

    #[test]
    fn test_import_reapplies_capacity() {
        let state = trained().export_state();
        let mut small = MoodEngine::new(EngineConfig {
            history: HistoryConfig {
                capacity: 4,
                ..HistoryConfig::default()
            },
            ..EngineConfig::default()
        });
        small.import_state(state.clone()).unwrap();
        assert_eq!(small.history().len(), 4);
        assert_eq!(small.history().newest().unwrap().id, state.history[5].id);
    }

    #[test]
    fn test_import_rejects_out_of_range_record() {
        let mut engine = trained();
        let before = engine.export_state();

        let mut state = before.clone();
        state.history[2].outcome.engagement = 7.0;
        state.history[3].outcome.duration_secs = -500.0;
        let err = engine.import_state(state).unwrap_err();
        assert!(matches!(err, MoodError::InvalidOutcome { .. }));
        assert_eq!(engine.export_state(), before);
    }

    #[test]
    fn test_import_rejects_out_of_range_pattern() {
        let mut engine = trained();
        let before = engine.export_state();

        let mut state = before.clone();
        state.patterns[0].confidence = 40.0;
        state.patterns[0].success_rate = -3.0;
        let err = engine.import_state(state).unwrap_err();
        assert!(matches!(err, MoodError::InvalidPattern { .. }));
        assert_eq!(engine.export_state(), before);

        let mut state = before.clone();
        state.ab_history[0].mean_a = 2.0;
        assert!(matches!(engine.import_state(state), Err(MoodError::InvalidTest { .. })));
        assert_eq!(engine.export_state(), before);
    }

    #[test]
    fn test_import_json_rejects_invalid_entries() {
        let mut engine = trained();
        let mut state = engine.export_state();
        state.history[0].outcome.feedback = 9.0;
        let json = serde_json::to_string(&state).unwrap();
        let err = engine.import_json(&json).unwrap_err();
        assert!(err.to_string().contains("failed to import engine state"));
        assert_eq!(engine.history().len(), 6);
    }

    #[test]
    fn test_import_json_garbage() {
        let mut engine = MoodEngine::default();
        let err = engine.import_json("{ not json").unwrap_err();
        assert!(err.to_string().contains("failed to parse engine state"));
    }
}

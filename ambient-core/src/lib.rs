// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Ambient mood engine: turns live venue sensing into a mood recommendation
//! and learns from the audience's response.

pub mod error;
pub mod mood;
pub mod context;
pub mod config;
pub mod fusion;
pub mod predictor;
pub mod patterns;
pub mod history;
pub mod decision;
pub mod engine;
pub mod persistence;
pub mod shared;

pub use ab_test::{ABTest, ABTestResult, AbTestController};
pub use config::EngineConfig;
pub use context::{AudioFeatures, Context, DayType, Environment, Season, TimeOfDay, VisionFeatures, Weather};
pub use decision::{AlternativeMood, ExpectedOutcome, MoodIntent, MoodPrediction};
pub use engine::{LearningStats, MoodEngine};
pub use error::{MoodError, Result};
pub use history::{LearningRecord, Outcome};
pub use mood::{Mood, MoodParameters};
pub use patterns::{Comparison, Condition, Pattern};
pub use persistence::EngineState;
pub use shared::SharedMoodEngine;

// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Boundary errors for the mood engine.
//!
//! Only explicit mutation entry points return these. Missing sensor data and
//! thin history are absorbed as fallbacks and never surface here.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MoodError {
    #[error("Unknown mood '{name}'. Valid: Energetic, Social, Contemplative, Mysterious, Peaceful")]
    UnknownMood { name: String },

    #[error("Invalid outcome: {reason}")]
    InvalidOutcome { reason: String },

    #[error("Engagement {value} out of range [0, 1]")]
    InvalidEngagement { value: f32 },

    #[error("Invalid pattern: {reason}")]
    InvalidPattern { reason: String },

    #[error("Invalid A/B test: {reason}")]
    InvalidTest { reason: String },

    #[error("A/B test {id} is already active; complete or cancel it first")]
    TestAlreadyActive { id: Uuid },

    #[error("Unsupported state version {found} (expected {expected})")]
    UnsupportedStateVersion { found: u32, expected: u32 },
}

impl MoodError {
    pub fn unknown_mood<S: Into<String>>(name: S) -> Self {
        Self::UnknownMood { name: name.into() }
    }

    pub fn invalid_outcome<S: Into<String>>(reason: S) -> Self {
        Self::InvalidOutcome {
            reason: reason.into(),
        }
    }

    pub fn invalid_pattern<S: Into<String>>(reason: S) -> Self {
        Self::InvalidPattern {
            reason: reason.into(),
        }
    }

    pub fn invalid_test<S: Into<String>>(reason: S) -> Self {
        Self::InvalidTest {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MoodError>;

/// Reject engagement values outside [0, 1] (including NaN).
pub(crate) fn check_engagement(value: f32) -> Result<f32> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(MoodError::InvalidEngagement { value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_mood_message_names_input() {
        let err = MoodError::unknown_mood("Bogus");
        assert!(err.to_string().contains("Bogus"));
    }

    #[test]
    fn test_check_engagement_bounds() {
        assert!(check_engagement(0.0).is_ok());
        assert!(check_engagement(1.0).is_ok());
        assert!(check_engagement(1.01).is_err());
        assert!(check_engagement(-0.1).is_err());
        assert!(check_engagement(f32::NAN).is_err());
    }
}

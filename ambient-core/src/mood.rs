// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Mood vocabulary — the closed set of ambient moods the engine can recommend.
//!
//! `Mood::ALL` fixes the order used by the predictor's output layer and by
//! every per-mood score vector. `Mood::profile()` is the only place the
//! default energy/valence/arousal and display metadata are defined.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MoodError;

/// Number of moods in the vocabulary.
pub const MOOD_COUNT: usize = 5;

/// Discrete ambient moods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Mood {
    /// High energy, fast movement, loud room.
    Energetic,
    /// Conversation-driven, warm and open.
    Social,
    /// Quiet focus, low stimulation.
    Contemplative,
    /// Dim, curious, late-night atmosphere.
    Mysterious,
    /// Calm and restful.
    Peaceful,
}

impl Mood {
    /// All moods in canonical order.
    pub const ALL: [Mood; MOOD_COUNT] = [
        Mood::Energetic,
        Mood::Social,
        Mood::Contemplative,
        Mood::Mysterious,
        Mood::Peaceful,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Energetic => "Energetic",
            Self::Social => "Social",
            Self::Contemplative => "Contemplative",
            Self::Mysterious => "Mysterious",
            Self::Peaceful => "Peaceful",
        }
    }

    /// Position in `Mood::ALL` (and in any `MoodScores`).
    pub fn index(self) -> usize {
        match self {
            Self::Energetic => 0,
            Self::Social => 1,
            Self::Contemplative => 2,
            Self::Mysterious => 3,
            Self::Peaceful => 4,
        }
    }

    /// Default parameters and display metadata.
    pub fn profile(self) -> MoodProfile {
        match self {
            Self::Energetic => MoodProfile {
                energy: 0.9,
                valence: 0.8,
                arousal: 0.9,
                color: "#FF6B35",
                description: "High-energy lighting and driving music for an active crowd",
            },
            Self::Social => MoodProfile {
                energy: 0.6,
                valence: 0.8,
                arousal: 0.6,
                color: "#F7C548",
                description: "Warm, open atmosphere that encourages conversation",
            },
            Self::Contemplative => MoodProfile {
                energy: 0.3,
                valence: 0.5,
                arousal: 0.3,
                color: "#4A6FA5",
                description: "Subdued, focused ambience for quiet attention",
            },
            Self::Mysterious => MoodProfile {
                energy: 0.4,
                valence: 0.4,
                arousal: 0.6,
                color: "#6B2D5C",
                description: "Low light and unusual textures that invite curiosity",
            },
            Self::Peaceful => MoodProfile {
                energy: 0.2,
                valence: 0.7,
                arousal: 0.2,
                color: "#7FB069",
                description: "Soft, slow ambience for rest and calm",
            },
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mood {
    type Err = MoodError;

    /// Parse a mood name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "energetic" => Ok(Self::Energetic),
            "social" => Ok(Self::Social),
            "contemplative" => Ok(Self::Contemplative),
            "mysterious" => Ok(Self::Mysterious),
            "peaceful" => Ok(Self::Peaceful),
            _ => Err(MoodError::unknown_mood(s)),
        }
    }
}

/// Static metadata for a mood.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoodProfile {
    /// Default energy [0, 1].
    pub energy: f32,
    /// Default valence [0, 1].
    pub valence: f32,
    /// Default arousal [0, 1].
    pub arousal: f32,
    /// Display color (hex).
    pub color: &'static str,
    pub description: &'static str,
}

/// The three continuous parameters handed to show-control dispatchers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoodParameters {
    pub energy: f32,
    pub valence: f32,
    pub arousal: f32,
}

impl MoodParameters {
    pub fn clamped(self) -> Self {
        Self {
            energy: self.energy.clamp(0.0, 1.0),
            valence: self.valence.clamp(0.0, 1.0),
            arousal: self.arousal.clamp(0.0, 1.0),
        }
    }
}

impl From<MoodProfile> for MoodParameters {
    fn from(profile: MoodProfile) -> Self {
        Self {
            energy: profile.energy,
            valence: profile.valence,
            arousal: profile.arousal,
        }
    }
}

// ─── Per-mood scores ─────────────────────────────────

/// One score per mood, indexed by `Mood::index()`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MoodScores(pub [f32; MOOD_COUNT]);

impl MoodScores {
    /// Exactly `1 / MOOD_COUNT` for every mood.
    pub fn uniform() -> Self {
        Self([1.0 / MOOD_COUNT as f32; MOOD_COUNT])
    }

    /// Constant `value` for every mood.
    pub fn splat(value: f32) -> Self {
        Self([value; MOOD_COUNT])
    }

    pub fn get(&self, mood: Mood) -> f32 {
        self.0[mood.index()]
    }

    pub fn set(&mut self, mood: Mood, value: f32) {
        self.0[mood.index()] = value;
    }

    pub fn add(&mut self, mood: Mood, delta: f32) {
        self.0[mood.index()] += delta;
    }

    pub fn total(&self) -> f32 {
        self.0.iter().sum()
    }

    /// Scale to a probability distribution. Non-positive or non-finite totals
    /// fall back to uniform.
    pub fn normalized(&self) -> Self {
        let clamped = self.0.map(|v| if v.is_finite() { v.max(0.0) } else { 0.0 });
        let total: f32 = clamped.iter().sum();
        if total <= f32::EPSILON {
            return Self::uniform();
        }
        Self(clamped.map(|v| v / total))
    }

    /// Moods sorted by descending score. Ties keep `Mood::ALL` order.
    pub fn ranked(&self) -> Vec<(Mood, f32)> {
        let mut ranked: Vec<(Mood, f32)> = Mood::ALL.iter().map(|&m| (m, self.get(m))).collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }

    /// Highest-scoring mood (first in `Mood::ALL` order on ties).
    pub fn best(&self) -> (Mood, f32) {
        self.ranked()[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Mood, f32)> + '_ {
        Mood::ALL.iter().map(move |&m| (m, self.get(m)))
    }
}

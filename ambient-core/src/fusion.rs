// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Feature fusion — turns a `Context` into a fixed, bounded feature vector.
//!
//! The vector carries fused features, not passthrough sensor values.
//! "Quiet activity" is the movement × silence interaction.
//!
//! | idx | feature         |
//! |-----|-----------------|
//! | 0   | overall energy  |
//! | 1   | quiet activity  |
//! | 2   | social index    |
//! | 3   | musicality      |
//! | 4   | time of day     |
//! | 5   | day type        |
//! | 6   | ambience        |

use serde::{Deserialize, Serialize};

use crate::config::FusionConfig;
use crate::context::{Context, DayType, Season, TimeOfDay, Weather};

/// Length of the fused feature vector.
pub const FEATURE_DIM: usize = 7;

pub const ENERGY: usize = 0;
pub const QUIET_ACTIVITY: usize = 1;
pub const SOCIAL: usize = 2;
pub const MUSICALITY: usize = 3;
pub const TIME_OF_DAY: usize = 4;
pub const DAY_TYPE: usize = 5;
pub const AMBIENCE: usize = 6;

/// Fused features, every element in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(pub [f32; FEATURE_DIM]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn energy(&self) -> f32 {
        self.0[ENERGY]
    }

    pub fn quiet_activity(&self) -> f32 {
        self.0[QUIET_ACTIVITY]
    }

    pub fn social(&self) -> f32 {
        self.0[SOCIAL]
    }
}

/// Scalar encoding of the time bucket.
pub fn time_of_day_scalar(time: TimeOfDay) -> f32 {
    match time {
        TimeOfDay::Morning => 0.25,
        TimeOfDay::Afternoon => 0.5,
        TimeOfDay::Evening => 0.75,
        TimeOfDay::Night => 1.0,
    }
}

fn day_type_scalar(day: DayType) -> f32 {
    match day {
        DayType::Weekday => 0.0,
        DayType::Weekend => 1.0,
    }
}

/// Brightness-like encoding: sunny/summer high, stormy/winter low.
fn weather_scalar(weather: Weather) -> f32 {
    match weather {
        Weather::Clear => 1.0,
        Weather::Cloudy => 0.6,
        Weather::Rainy => 0.35,
        Weather::Snowy => 0.25,
        Weather::Stormy => 0.1,
    }
}

fn season_scalar(season: Season) -> f32 {
    match season {
        Season::Spring => 0.6,
        Season::Summer => 1.0,
        Season::Autumn => 0.4,
        Season::Winter => 0.2,
    }
}

/// Fuse a context into a feature vector.
///
/// Absent vision reads as an empty, still room; absent audio reads as silence.
pub fn to_feature_vector(context: &Context, config: &FusionConfig) -> FeatureVector {
    let scale = config.crowd_scale.max(1.0);
    let crowd = (context.people_count() as f32 / scale).clamp(0.0, 1.0);
    let movement = context.movement().clamp(0.0, 1.0);
    let audio_energy = context.audio_energy().clamp(0.0, 1.0);
    let conversational = context.conversational().clamp(0.0, 1.0);
    let musical = context.musical().clamp(0.0, 1.0);

    let [w_crowd, w_movement, w_audio] = config.energy_weights;
    let energy = w_crowd * crowd + w_movement * movement + w_audio * audio_energy;
    let quiet_activity = movement * (1.0 - audio_energy);
    let social = config.social_crowd_weight * crowd + (1.0 - config.social_crowd_weight) * conversational;

    let env = &context.environment;
    let ambience = env
        .weather
        .map(weather_scalar)
        .unwrap_or_else(|| season_scalar(env.season));

    let mut features = [0.0f32; FEATURE_DIM];
    features[ENERGY] = energy;
    features[QUIET_ACTIVITY] = quiet_activity;
    features[SOCIAL] = social;
    features[MUSICALITY] = musical;
    features[TIME_OF_DAY] = time_of_day_scalar(env.time_of_day);
    features[DAY_TYPE] = day_type_scalar(env.day_type);
    features[AMBIENCE] = ambience;

    FeatureVector(features.map(|v| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }))
}

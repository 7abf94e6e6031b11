// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Context — one timestamped snapshot of sensor features and environment.
//!
//! Vision and audio are optional: a sensor that is offline simply leaves its
//! sub-object empty, and every consumer falls back to neutral defaults.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Vision features from the upstream camera pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisionFeatures {
    /// Detected people in frame.
    pub people_count: u32,
    /// Average movement magnitude [0, 1].
    pub avg_movement: f32,
    /// Crowd density [0, 1].
    pub crowd_density: f32,
    /// Detector confidence [0, 1].
    pub confidence: f32,
}

impl VisionFeatures {
    pub fn new(people_count: u32, avg_movement: f32) -> Self {
        Self {
            people_count,
            avg_movement: avg_movement.clamp(0.0, 1.0),
            crowd_density: (people_count as f32 / 50.0).clamp(0.0, 1.0),
            confidence: 1.0,
        }
    }
}

/// Audio features from the upstream microphone pipeline. All values [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub volume: f32,
    pub energy: f32,
    /// Likelihood the room is dominated by speech.
    pub conversational: f32,
    /// Likelihood the room is dominated by music.
    pub musical: f32,
    pub ambient_noise: f32,
    /// Normalized spectral centroid (brightness).
    pub spectral_centroid: f32,
}

impl AudioFeatures {
    pub fn new(energy: f32, conversational: f32, musical: f32) -> Self {
        let energy = energy.clamp(0.0, 1.0);
        Self {
            volume: energy,
            energy,
            conversational: conversational.clamp(0.0, 1.0),
            musical: musical.clamp(0.0, 1.0),
            ambient_noise: 0.0,
            spectral_centroid: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    /// Bucket an hour of day: 5–11 morning, 12–16 afternoon, 17–21 evening, else night.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => Self::Morning,
            12..=16 => Self::Afternoon,
            17..=21 => Self::Evening,
            _ => Self::Night,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    Weekday,
    Weekend,
}

impl DayType {
    pub fn from_weekday(day: Weekday) -> Self {
        match day {
            Weekday::Sat | Weekday::Sun => Self::Weekend,
            _ => Self::Weekday,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Weekday => "weekday",
            Self::Weekend => "weekend",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Northern-hemisphere meteorological seasons.
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Self::Spring,
            6..=8 => Self::Summer,
            9..=11 => Self::Autumn,
            _ => Self::Winter,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
            Self::Winter => "winter",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    Clear,
    Cloudy,
    Rainy,
    Snowy,
    Stormy,
}

impl Weather {
    pub fn name(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Cloudy => "cloudy",
            Self::Rainy => "rainy",
            Self::Snowy => "snowy",
            Self::Stormy => "stormy",
        }
    }
}

/// Calendar and clock metadata supplied by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub time_of_day: TimeOfDay,
    pub day_type: DayType,
    pub season: Season,
    pub weather: Option<Weather>,
    /// Named special events (e.g. "live-band", "product-launch").
    #[serde(default)]
    pub special_events: Vec<String>,
}

impl Environment {
    pub fn new(time_of_day: TimeOfDay, day_type: DayType) -> Self {
        Self {
            time_of_day,
            day_type,
            season: Season::Spring,
            weather: None,
            special_events: Vec::new(),
        }
    }

    /// Derive time bucket, day type and season from a wall-clock instant.
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self {
            time_of_day: TimeOfDay::from_hour(at.hour()),
            day_type: DayType::from_weekday(at.weekday()),
            season: Season::from_month(at.month()),
            weather: None,
            special_events: Vec::new(),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(TimeOfDay::Afternoon, DayType::Weekday)
    }
}

/// A value resolved from a context path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f32),
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f32> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// Immutable snapshot of the world at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    pub timestamp: DateTime<Utc>,
    pub vision: Option<VisionFeatures>,
    pub audio: Option<AudioFeatures>,
    pub environment: Environment,
}

impl Context {
    /// New context stamped with the current time.
    pub fn new(environment: Environment) -> Self {
        Self::at(Utc::now(), environment)
    }

    pub fn at(timestamp: DateTime<Utc>, environment: Environment) -> Self {
        Self {
            timestamp,
            vision: None,
            audio: None,
            environment,
        }
    }

    pub fn with_vision(self, vision: VisionFeatures) -> Self {
        Self {
            vision: Some(vision),
            ..self
        }
    }

    pub fn with_audio(self, audio: AudioFeatures) -> Self {
        Self {
            audio: Some(audio),
            ..self
        }
    }

    pub fn with_weather(mut self, weather: Weather) -> Self {
        self.environment.weather = Some(weather);
        self
    }

    pub fn with_event<S: Into<String>>(mut self, event: S) -> Self {
        self.environment.special_events.push(event.into());
        self
    }

    /// People count, 0 when vision is offline.
    pub fn people_count(&self) -> u32 {
        self.vision.as_ref().map_or(0, |v| v.people_count)
    }

    /// Movement magnitude, 0 when vision is offline.
    pub fn movement(&self) -> f32 {
        self.vision.as_ref().map_or(0.0, |v| v.avg_movement)
    }

    /// Audio energy, 0 when audio is offline.
    pub fn audio_energy(&self) -> f32 {
        self.audio.as_ref().map_or(0.0, |a| a.energy)
    }

    pub fn conversational(&self) -> f32 {
        self.audio.as_ref().map_or(0.0, |a| a.conversational)
    }

    pub fn musical(&self) -> f32 {
        self.audio.as_ref().map_or(0.0, |a| a.musical)
    }

    /// Resolve a dotted path such as `"vision.people_count"`.
    ///
    /// Returns `None` for unknown paths and for fields whose sensor is absent.
    pub fn field(&self, path: &str) -> Option<FieldValue> {
        let (section, name) = path.split_once('.')?;
        match section {
            "vision" => {
                let v = self.vision.as_ref()?;
                let n = match name {
                    "people_count" => v.people_count as f32,
                    "avg_movement" | "movement" => v.avg_movement,
                    "crowd_density" => v.crowd_density,
                    "confidence" => v.confidence,
                    _ => return None,
                };
                Some(FieldValue::Number(n))
            }
            "audio" => {
                let a = self.audio.as_ref()?;
                let n = match name {
                    "volume" => a.volume,
                    "energy" => a.energy,
                    "conversational" => a.conversational,
                    "musical" => a.musical,
                    "ambient_noise" => a.ambient_noise,
                    "spectral_centroid" => a.spectral_centroid,
                    _ => return None,
                };
                Some(FieldValue::Number(n))
            }
            "environment" => {
                let env = &self.environment;
                match name {
                    "time_of_day" => Some(env.time_of_day.name().into()),
                    "day_type" => Some(env.day_type.name().into()),
                    "season" => Some(env.season.name().into()),
                    "weather" => env.weather.map(|w| w.name().into()),
                    "special_events" => Some(FieldValue::List(env.special_events.clone())),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

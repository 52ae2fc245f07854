//! Fishing-condition scorer
//!
//! A fixed-weight rule evaluator: each weather factor adds or removes points
//! from a base of 50 and the sum is clamped to `0..=100`. Everything here is a
//! pure function of its arguments.

use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;

const BASE_SCORE: i32 = 50;

pub const WINDOW_PRIME: &str = "06:00 - 09:00";
pub const WINDOW_EVENING: &str = "17:00 - 20:00";
pub const WINDOW_EARLY: &str = "05:30 - 08:30";

/// Scoring inputs for one forecast day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInputs {
    /// Mean of the day's max and min temperature, °C
    pub avg_temp: f64,
    /// Chance of rain, %
    pub rain_chance: f64,
    /// Day max wind, km/h
    pub max_wind: f64,
    /// Moon illumination, %
    pub moon_illumination: f64,
    /// Average humidity, %
    pub avg_humidity: f64,
}

fn temperature_points(avg_temp: f64) -> i32 {
    if (15.0..=25.0).contains(&avg_temp) {
        20
    } else if (10.0..15.0).contains(&avg_temp) || (avg_temp > 25.0 && avg_temp <= 30.0) {
        10
    } else {
        0
    }
}

fn rain_points(rain_chance: f64) -> i32 {
    if rain_chance < 30.0 {
        15
    } else if rain_chance < 60.0 {
        5
    } else {
        -10
    }
}

fn wind_points(max_wind: f64) -> i32 {
    if (10.0..=25.0).contains(&max_wind) {
        10
    } else if max_wind > 35.0 {
        -15
    } else {
        0
    }
}

fn moon_points(illumination: f64) -> i32 {
    if illumination > 90.0 || illumination < 10.0 {
        15
    } else if (40.0..=60.0).contains(&illumination) {
        10
    } else {
        0
    }
}

fn humidity_points(avg_humidity: f64) -> i32 {
    if (50.0..=80.0).contains(&avg_humidity) { 5 } else { 0 }
}

fn pressure_points(pressure: f64) -> i32 {
    if (1010.0..=1020.0).contains(&pressure) {
        15
    } else if (1005.0..1010.0).contains(&pressure) {
        10
    } else {
        0
    }
}

fn clamp_score(sum: i32) -> u8 {
    sum.clamp(0, 100) as u8
}

fn raw_score(inputs: &ScoreInputs) -> i32 {
    BASE_SCORE
        + temperature_points(inputs.avg_temp)
        + rain_points(inputs.rain_chance)
        + wind_points(inputs.max_wind)
        + moon_points(inputs.moon_illumination)
        + humidity_points(inputs.avg_humidity)
}

/// Suitability score in `0..=100`
#[must_use]
pub fn score(inputs: &ScoreInputs) -> u8 {
    clamp_score(raw_score(inputs))
}

/// Score with the optional factors enabled in `config`.
/// Pressure is in hPa.
#[must_use]
pub fn score_with(inputs: &ScoreInputs, pressure: f64, config: &ScoringConfig) -> u8 {
    let mut sum = raw_score(inputs);
    if config.pressure_bonus {
        sum += pressure_points(pressure);
    }
    clamp_score(sum)
}

fn moon_descriptor(phase: &str) -> String {
    if phase.contains("Full") {
        "Full moon phase".to_string()
    } else if phase.contains("New") {
        "New moon phase".to_string()
    } else {
        format!("{phase} moon")
    }
}

fn temperature_descriptor(avg_temp: f64) -> String {
    if (15.0..=25.0).contains(&avg_temp) {
        "optimal temperature".to_string()
    } else {
        format!("{avg_temp:.1}°C")
    }
}

fn rain_descriptor(rain_chance: f64) -> &'static str {
    if rain_chance < 30.0 {
        "clear conditions"
    } else if rain_chance < 60.0 {
        "possible light rain"
    } else {
        "rainy conditions"
    }
}

fn wind_descriptor(max_wind: f64) -> Option<&'static str> {
    if (10.0..=25.0).contains(&max_wind) {
        Some("favorable wind")
    } else if max_wind > 35.0 {
        Some("strong winds")
    } else {
        None
    }
}

/// Human-readable summary of the day, built independently of the score
#[must_use]
pub fn describe_conditions(inputs: &ScoreInputs, moon_phase: &str) -> String {
    let mut parts = vec![
        moon_descriptor(moon_phase),
        temperature_descriptor(inputs.avg_temp),
        rain_descriptor(inputs.rain_chance).to_string(),
    ];
    if let Some(wind) = wind_descriptor(inputs.max_wind) {
        parts.push(wind.to_string());
    }
    parts.join(", ")
}

/// Recommended hours to fish for a score tier
#[must_use]
pub fn time_window(score: u8) -> &'static str {
    match score {
        80.. => WINDOW_PRIME,
        60..=79 => WINDOW_EVENING,
        _ => WINDOW_EARLY,
    }
}

/// Display rating for a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ScoreRating {
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => ScoreRating::Excellent,
            60..=79 => ScoreRating::Good,
            40..=59 => ScoreRating::Fair,
            _ => ScoreRating::Poor,
        }
    }
}

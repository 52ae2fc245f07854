//! Fishing module
//!
//! Turns forecast days into best-time-to-fish recommendations:
//! - Rule-based suitability scoring per day
//! - Condition summaries and time-window selection
//! - Ranking of the forecast horizon by score

pub mod predictions;
pub mod scoring;

pub use predictions::{
    FishingPrediction, STANDARD_PRESSURE_HPA, assemble_predictions, build_predictions, predict_day,
};
pub use scoring::{ScoreInputs, ScoreRating, describe_conditions, score, score_with, time_window};

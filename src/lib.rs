//! `FishLog` - personal fishing log with weather-based fishing predictions
//!
//! This library provides the weather gateway, the fishing-condition scorer,
//! coordinate formatting, and the trip/location store behind the HTTP API.

pub mod api;
pub mod config;
pub mod coordinates;
pub mod error;
pub mod export;
pub mod fishing;
pub mod models;
pub mod sequencer;
pub mod store;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use config::FishLogConfig;
pub use coordinates::{DmsCoordinate, FormattedCoordinates, Hemisphere};
pub use error::{CoordinateParseError, FishLogError};
pub use fishing::{FishingPrediction, ScoreRating};
pub use models::{FishingTrip, NewLocation, NewTrip, SavedLocation};
pub use sequencer::RequestSequencer;
pub use store::LogStore;
pub use weather::{ForecastDay, MoonPhase, WeatherData, WeatherGateway, WeatherProvider, WindName};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, FishLogError>;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Result;

pub mod gateway;
pub mod weather_api;

pub use gateway::{RequestKind, WeatherGateway, WeatherPayload};
pub use weather_api::WeatherApiClient;

/// Forecast horizon bounds accepted by the gateway
pub const MIN_FORECAST_DAYS: u8 = 3;
pub const MAX_FORECAST_DAYS: u8 = 7;

/// Current conditions at a location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherData {
    /// `"<name>, <country>"`
    pub location: String,
    /// Temperature in Celsius
    pub temperature: f64,
    pub condition: String,
    /// Wind speed in km/h
    pub wind_speed: f64,
    /// Compass direction as reported by the provider, e.g. `"WSW"`
    pub wind_direction: String,
    pub wind_name: WindName,
    /// Atmospheric pressure in hPa
    pub pressure: f64,
    /// Relative humidity percentage
    pub humidity: f64,
    pub moon_phase: String,
    /// Illuminated share of the moon's disk, 0-100
    pub moon_illumination: f64,
}

/// One calendar day of forecast, the input of the fishing scorer
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    pub date: NaiveDate,
    /// Max temperature in Celsius
    pub max_temp: f64,
    /// Min temperature in Celsius
    pub min_temp: f64,
    pub condition: String,
    /// Chance of rain, 0-100
    pub chance_of_rain: f64,
    pub moon_phase: String,
    /// Illuminated share of the moon's disk, 0-100
    pub moon_illumination: f64,
    /// Local sunrise as reported by the provider, e.g. `"06:12 AM"`
    pub sunrise: String,
    pub sunset: String,
    /// Average relative humidity, 0-100
    pub avg_humidity: f64,
    /// Max wind speed in km/h
    pub max_wind: f64,
    pub wind_name: WindName,
}

impl ForecastDay {
    /// Mean of the day's max and min temperature
    #[must_use]
    pub fn avg_temp(&self) -> f64 {
        (self.max_temp + self.min_temp) / 2.0
    }
}

/// Wind descriptor derived from speed bands in km/h
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindName {
    Calm,
    #[serde(rename = "Light Air")]
    LightAir,
    #[serde(rename = "Light Breeze")]
    LightBreeze,
    #[serde(rename = "Gentle Breeze")]
    GentleBreeze,
    #[serde(rename = "Moderate Breeze")]
    ModerateBreeze,
    #[serde(rename = "Fresh Breeze")]
    FreshBreeze,
    #[serde(rename = "Strong Breeze")]
    StrongBreeze,
    #[serde(rename = "Near Gale")]
    NearGale,
    Gale,
    #[serde(rename = "Strong Gale")]
    StrongGale,
    Storm,
    #[serde(rename = "Violent Storm")]
    ViolentStorm,
    Hurricane,
}

/// Exclusive upper bound of each band, in km/h; anything above is a hurricane
const WIND_BANDS: [(f64, WindName); 12] = [
    (1.0, WindName::Calm),
    (6.0, WindName::LightAir),
    (12.0, WindName::LightBreeze),
    (20.0, WindName::GentleBreeze),
    (29.0, WindName::ModerateBreeze),
    (39.0, WindName::FreshBreeze),
    (50.0, WindName::StrongBreeze),
    (62.0, WindName::NearGale),
    (75.0, WindName::Gale),
    (89.0, WindName::StrongGale),
    (103.0, WindName::Storm),
    (118.0, WindName::ViolentStorm),
];

impl WindName {
    #[must_use]
    pub fn from_speed_kph(speed: f64) -> Self {
        WIND_BANDS
            .iter()
            .find(|(upper, _)| speed < *upper)
            .map_or(WindName::Hurricane, |(_, name)| *name)
    }
}

/// Moon phase label, used when the provider does not name the phase itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoonPhase {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

const MOON_PHASES: [MoonPhase; 8] = [
    MoonPhase::New,
    MoonPhase::WaxingCrescent,
    MoonPhase::FirstQuarter,
    MoonPhase::WaxingGibbous,
    MoonPhase::Full,
    MoonPhase::WaningGibbous,
    MoonPhase::LastQuarter,
    MoonPhase::WaningCrescent,
];

impl MoonPhase {
    /// Eight 12.5-wide bands over `[0, 100)`; 100 folds back to `New`
    #[must_use]
    pub fn from_illumination(illumination: f64) -> Self {
        let clamped = illumination.clamp(0.0, 100.0);
        let band = (clamped / 12.5).floor() as usize % MOON_PHASES.len();
        MOON_PHASES[band]
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            MoonPhase::New => "New Moon",
            MoonPhase::WaxingCrescent => "Waxing Crescent",
            MoonPhase::FirstQuarter => "First Quarter",
            MoonPhase::WaxingGibbous => "Waxing Gibbous",
            MoonPhase::Full => "Full Moon",
            MoonPhase::WaningGibbous => "Waning Gibbous",
            MoonPhase::LastQuarter => "Last Quarter",
            MoonPhase::WaningCrescent => "Waning Crescent",
        }
    }
}

impl fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Source of raw weather data for a coordinate.
///
/// Implementations return errors; the [`WeatherGateway`] turns them into the
/// empty/`None` sentinels callers see.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, latitude: f64, longitude: f64) -> Result<WeatherData>;

    /// Ambient pressure in hPa, without the moon context `current` gathers
    async fn current_pressure(&self, latitude: f64, longitude: f64) -> Result<f64> {
        Ok(self.current(latitude, longitude).await?.pressure)
    }

    async fn forecast(&self, latitude: f64, longitude: f64, days: u8) -> Result<Vec<ForecastDay>>;
}

//! Prediction assembly: forecast days in, ranked fishing predictions out

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::scoring::{self, ScoreInputs, ScoreRating};
use crate::Result;
use crate::config::ScoringConfig;
use crate::weather::{ForecastDay, WeatherProvider};

/// Used when current conditions are unavailable
pub const STANDARD_PRESSURE_HPA: f64 = 1013.0;

/// Best-time-to-fish recommendation for one forecast day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FishingPrediction {
    pub date: NaiveDate,
    pub time_window: String,
    /// Suitability score, 0-100
    pub score: u8,
    pub rating: ScoreRating,
    pub conditions: String,
    /// Mean of the day's max and min temperature, °C
    pub temperature: f64,
    pub moon_phase: String,
    /// Ambient pressure in hPa, informational
    pub pressure: f64,
}

impl From<&ForecastDay> for ScoreInputs {
    fn from(day: &ForecastDay) -> Self {
        Self {
            avg_temp: day.avg_temp(),
            rain_chance: day.chance_of_rain,
            max_wind: day.max_wind,
            moon_illumination: day.moon_illumination,
            avg_humidity: day.avg_humidity,
        }
    }
}

/// Score a single day
#[must_use]
pub fn predict_day(day: &ForecastDay, pressure: f64, config: &ScoringConfig) -> FishingPrediction {
    let inputs = ScoreInputs::from(day);
    let score = scoring::score_with(&inputs, pressure, config);

    FishingPrediction {
        date: day.date,
        time_window: scoring::time_window(score).to_string(),
        score,
        rating: ScoreRating::from_score(score),
        conditions: scoring::describe_conditions(&inputs, &day.moon_phase),
        temperature: inputs.avg_temp,
        moon_phase: day.moon_phase.clone(),
        pressure,
    }
}

/// Score every day and order by score, highest first. Days with equal scores
/// keep their chronological order.
#[must_use]
pub fn assemble_predictions(
    days: &[ForecastDay],
    pressure: f64,
    config: &ScoringConfig,
) -> Vec<FishingPrediction> {
    let mut predictions: Vec<FishingPrediction> = days
        .iter()
        .map(|day| predict_day(day, pressure, config))
        .collect();
    // sort_by is stable
    predictions.sort_by(|a, b| b.score.cmp(&a.score));
    predictions
}

/// Fetch the forecast and current conditions for a coordinate and rank the
/// forecast days. An empty forecast yields an empty list.
#[instrument(level = "debug", skip(provider, config))]
pub async fn build_predictions(
    provider: &dyn WeatherProvider,
    latitude: f64,
    longitude: f64,
    days: u8,
    config: &ScoringConfig,
) -> Result<Vec<FishingPrediction>> {
    let forecast = provider.forecast(latitude, longitude, days).await?;
    if forecast.is_empty() {
        debug!("Forecast returned no days");
        return Ok(Vec::new());
    }

    let pressure = match provider.current_pressure(latitude, longitude).await {
        Ok(pressure) => pressure,
        Err(e) => {
            warn!("Current conditions unavailable, assuming standard pressure: {e}");
            STANDARD_PRESSURE_HPA
        }
    };

    Ok(assemble_predictions(&forecast, pressure, config))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::FishLogError;
    use crate::weather::{WeatherData, WindName};
    use async_trait::async_trait;

    pub(crate) fn forecast_day(
        day_of_month: u32,
        max_temp: f64,
        min_temp: f64,
        rain: f64,
        wind: f64,
        moon_illumination: f64,
        humidity: f64,
    ) -> ForecastDay {
        ForecastDay {
            date: NaiveDate::from_ymd_opt(2024, 6, day_of_month).unwrap(),
            max_temp,
            min_temp,
            condition: "Partly cloudy".to_string(),
            chance_of_rain: rain,
            moon_phase: "Waxing Gibbous".to_string(),
            moon_illumination,
            sunrise: "04:43 AM".to_string(),
            sunset: "09:11 PM".to_string(),
            avg_humidity: humidity,
            max_wind: wind,
            wind_name: WindName::from_speed_kph(wind),
        }
    }

    /// Days scoring 40, 90, 90 and 60 in that order
    pub(crate) fn mixed_forecast() -> Vec<ForecastDay> {
        vec![
            forecast_day(1, 5.0, 5.0, 70.0, 5.0, 25.0, 30.0),
            forecast_day(2, 20.0, 20.0, 40.0, 30.0, 50.0, 65.0),
            forecast_day(3, 22.0, 18.0, 40.0, 30.0, 50.0, 65.0),
            forecast_day(4, 12.0, 12.0, 70.0, 15.0, 25.0, 30.0),
        ]
    }

    struct FakeProvider {
        days: Vec<ForecastDay>,
        pressure: Option<f64>,
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn current(&self, _latitude: f64, _longitude: f64) -> Result<WeatherData> {
            let pressure = self
                .pressure
                .ok_or_else(|| FishLogError::fetch("current unavailable"))?;
            Ok(WeatherData {
                location: "Test, Nowhere".to_string(),
                temperature: 18.0,
                condition: "Sunny".to_string(),
                wind_speed: 12.0,
                wind_direction: "N".to_string(),
                wind_name: WindName::GentleBreeze,
                pressure,
                humidity: 60.0,
                moon_phase: "Full Moon".to_string(),
                moon_illumination: 95.0,
            })
        }

        async fn forecast(
            &self,
            _latitude: f64,
            _longitude: f64,
            days: u8,
        ) -> Result<Vec<ForecastDay>> {
            Ok(self.days.iter().take(days as usize).cloned().collect())
        }
    }

    #[test]
    fn test_ordering_is_stable_by_score() {
        let predictions = assemble_predictions(&mixed_forecast(), 1013.0, &ScoringConfig::default());

        let scores: Vec<u8> = predictions.iter().map(|p| p.score).collect();
        assert_eq!(scores, vec![90, 90, 60, 40]);

        let days: Vec<u32> = predictions
            .iter()
            .map(|p| chrono::Datelike::day(&p.date))
            .collect();
        assert_eq!(days, vec![2, 3, 4, 1]);
    }

    #[test]
    fn test_predict_day_london_scenario() {
        let mut day = forecast_day(1, 22.0, 14.0, 20.0, 15.0, 95.0, 65.0);
        day.moon_phase = "Full Moon".to_string();

        let prediction = predict_day(&day, 1016.0, &ScoringConfig::default());

        assert_eq!(prediction.score, 100);
        assert_eq!(prediction.time_window, "06:00 - 09:00");
        assert_eq!(prediction.rating, ScoreRating::Excellent);
        assert_eq!(prediction.temperature, 18.0);
        assert_eq!(prediction.pressure, 1016.0);
        assert!(prediction.conditions.contains("optimal temperature"));
        assert!(prediction.conditions.contains("clear conditions"));
        assert!(prediction.conditions.contains("favorable wind"));
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let days = mixed_forecast();
        let first = assemble_predictions(&days, 1013.0, &ScoringConfig::default());
        let second = assemble_predictions(&days, 1013.0, &ScoringConfig::default());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_build_predictions_uses_current_pressure() {
        let provider = FakeProvider {
            days: mixed_forecast(),
            pressure: Some(1008.0),
        };
        let predictions = build_predictions(&provider, 51.5, -0.09, 7, &ScoringConfig::default())
            .await
            .unwrap();
        assert_eq!(predictions.len(), 4);
        assert!(predictions.iter().all(|p| p.pressure == 1008.0));
    }

    #[tokio::test]
    async fn test_build_predictions_falls_back_to_standard_pressure() {
        let provider = FakeProvider {
            days: mixed_forecast(),
            pressure: None,
        };
        let predictions = build_predictions(&provider, 51.5, -0.09, 3, &ScoringConfig::default())
            .await
            .unwrap();
        assert_eq!(predictions.len(), 3);
        assert!(predictions.iter().all(|p| p.pressure == STANDARD_PRESSURE_HPA));
    }

    #[tokio::test]
    async fn test_build_predictions_empty_forecast() {
        let provider = FakeProvider {
            days: Vec::new(),
            pressure: Some(1013.0),
        };
        let predictions = build_predictions(&provider, 0.0, 0.0, 7, &ScoringConfig::default())
            .await
            .unwrap();
        assert!(predictions.is_empty());
    }
}

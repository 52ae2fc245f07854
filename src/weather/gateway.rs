//! Weather gateway
//!
//! Front door for everything that needs weather. Provider failures stop here:
//! callers get `None` or an empty list, which means "unavailable", and never a
//! zero-filled result.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

use super::{ForecastDay, MAX_FORECAST_DAYS, MIN_FORECAST_DAYS, WeatherApiClient, WeatherData, WeatherProvider};
use crate::config::{FishLogConfig, ScoringConfig};
use crate::fishing::{self, FishingPrediction};
use crate::{FishLogError, Result};

/// What a caller asks the gateway for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Current,
    Forecast,
    Predictions,
}

impl FromStr for RequestKind {
    type Err = FishLogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "current" => Ok(RequestKind::Current),
            "forecast" => Ok(RequestKind::Forecast),
            "predictions" => Ok(RequestKind::Predictions),
            other => Err(FishLogError::validation(format!(
                "Invalid request type '{other}'"
            ))),
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestKind::Current => "current",
            RequestKind::Forecast => "forecast",
            RequestKind::Predictions => "predictions",
        };
        f.write_str(name)
    }
}

/// Normalized result of a gateway request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WeatherPayload {
    Current(Option<WeatherData>),
    Forecast(Vec<ForecastDay>),
    Predictions(Vec<FishingPrediction>),
}

impl WeatherPayload {
    /// Whether the payload is the "unavailable" sentinel
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        match self {
            WeatherPayload::Current(current) => current.is_none(),
            WeatherPayload::Forecast(days) => days.is_empty(),
            WeatherPayload::Predictions(predictions) => predictions.is_empty(),
        }
    }
}

#[derive(Clone)]
pub struct WeatherGateway {
    provider: Arc<dyn WeatherProvider>,
    forecast_days: u8,
    scoring: ScoringConfig,
}

impl WeatherGateway {
    /// The forecast horizon is clamped into `3..=7` days
    pub fn new(provider: Arc<dyn WeatherProvider>, forecast_days: u8, scoring: ScoringConfig) -> Self {
        Self {
            provider,
            forecast_days: forecast_days.clamp(MIN_FORECAST_DAYS, MAX_FORECAST_DAYS),
            scoring,
        }
    }

    /// Build a gateway backed by WeatherAPI.com.
    ///
    /// Fails with [`FishLogError::Config`] when no API key is configured.
    pub fn from_config(config: &FishLogConfig) -> Result<Self> {
        let client = WeatherApiClient::from_config(&config.weather)?;
        info!(
            "Weather gateway ready ({} day horizon, pressure bonus {})",
            config.weather.forecast_days, config.scoring.pressure_bonus
        );
        Ok(Self::new(
            Arc::new(client),
            config.weather.forecast_days,
            config.scoring,
        ))
    }

    #[must_use]
    pub fn forecast_days(&self) -> u8 {
        self.forecast_days
    }

    pub async fn try_current_weather(&self, latitude: f64, longitude: f64) -> Result<WeatherData> {
        self.provider.current(latitude, longitude).await
    }

    pub async fn try_forecast(&self, latitude: f64, longitude: f64) -> Result<Vec<ForecastDay>> {
        self.provider
            .forecast(latitude, longitude, self.forecast_days)
            .await
    }

    pub async fn try_fishing_predictions(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<FishingPrediction>> {
        fishing::build_predictions(
            self.provider.as_ref(),
            latitude,
            longitude,
            self.forecast_days,
            &self.scoring,
        )
        .await
    }

    /// Current conditions, `None` when unavailable
    pub async fn current_weather(&self, latitude: f64, longitude: f64) -> Option<WeatherData> {
        self.try_current_weather(latitude, longitude)
            .await
            .map_err(|e| warn!("Error fetching weather: {e}"))
            .ok()
    }

    /// Forecast days, empty when unavailable
    pub async fn forecast(&self, latitude: f64, longitude: f64) -> Vec<ForecastDay> {
        self.try_forecast(latitude, longitude)
            .await
            .unwrap_or_else(|e| {
                warn!("Error fetching forecast: {e}");
                Vec::new()
            })
    }

    /// Ranked predictions, empty when unavailable
    pub async fn fishing_predictions(&self, latitude: f64, longitude: f64) -> Vec<FishingPrediction> {
        self.try_fishing_predictions(latitude, longitude)
            .await
            .unwrap_or_else(|e| {
                warn!("Error generating predictions: {e}");
                Vec::new()
            })
    }

    pub async fn fetch(&self, latitude: f64, longitude: f64, kind: RequestKind) -> WeatherPayload {
        match kind {
            RequestKind::Current => {
                WeatherPayload::Current(self.current_weather(latitude, longitude).await)
            }
            RequestKind::Forecast => {
                WeatherPayload::Forecast(self.forecast(latitude, longitude).await)
            }
            RequestKind::Predictions => {
                WeatherPayload::Predictions(self.fishing_predictions(latitude, longitude).await)
            }
        }
    }
}

impl fmt::Debug for WeatherGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherGateway")
            .field("forecast_days", &self.forecast_days)
            .field("scoring", &self.scoring)
            .finish_non_exhaustive()
    }
}

//! WeatherAPI.com client
//!
//! Fetches current conditions and daily forecasts and reshapes the provider's
//! JSON into [`WeatherData`] and [`ForecastDay`].

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::{ForecastDay, WeatherData, WeatherProvider};
use crate::config::WeatherConfig;
use crate::{FishLogError, Result};

/// HTTP client for the WeatherAPI.com REST endpoints
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WeatherApiClient {
    /// Create a client. A missing or blank key is a configuration error, not
    /// something a retry could fix.
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(FishLogError::config("Weather API key not configured"));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FishLogError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn from_config(config: &WeatherConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .ok_or_else(|| FishLogError::config("Weather API key not configured"))?;
        Self::new(
            api_key,
            &config.base_url,
            Duration::from_secs(u64::from(config.timeout_seconds)),
        )
    }

    fn url(&self, endpoint: &str, latitude: f64, longitude: f64, extra: &str) -> String {
        format!(
            "{}/{}.json?key={}&q={},{}&aqi=no{}",
            self.base_url,
            endpoint,
            urlencoding::encode(&self.api_key),
            latitude,
            longitude,
            extra
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, endpoint: &str) -> Result<T> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FishLogError::fetch(format!(
                "Weather API {endpoint} request failed with status {status}"
            )));
        }

        response.json::<T>().await.map_err(|e| {
            FishLogError::fetch(format!("Failed to parse weather {endpoint} response: {e}"))
        })
    }

    #[instrument(level = "debug", skip(self))]
    async fn fetch_current(&self, latitude: f64, longitude: f64) -> Result<wire::CurrentResponse> {
        let url = self.url("current", latitude, longitude, "");
        self.get_json(&url, "current").await
    }

    #[instrument(level = "debug", skip(self))]
    async fn fetch_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        days: u8,
    ) -> Result<wire::ForecastResponse> {
        let url = self.url("forecast", latitude, longitude, &format!("&days={days}"));
        let response: wire::ForecastResponse = self.get_json(&url, "forecast").await?;
        debug!(
            "Received {} forecast days",
            response.forecast.forecastday.len()
        );
        Ok(response)
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiClient {
    #[instrument(level = "debug", skip(self))]
    async fn current(&self, latitude: f64, longitude: f64) -> Result<WeatherData> {
        let response = self.fetch_current(latitude, longitude).await?;

        // Moon context comes from today's astro block of a one-day forecast
        let astro = match self.fetch_forecast(latitude, longitude, 1).await {
            Ok(forecast) => forecast
                .forecast
                .forecastday
                .into_iter()
                .next()
                .map(|day| day.astro),
            Err(e) => {
                warn!("Moon data unavailable for current weather: {e}");
                None
            }
        };

        Ok(wire::normalize_current(response, astro.as_ref()))
    }

    async fn current_pressure(&self, latitude: f64, longitude: f64) -> Result<f64> {
        let response = self.fetch_current(latitude, longitude).await?;
        Ok(response.current.pressure_mb)
    }

    async fn forecast(&self, latitude: f64, longitude: f64, days: u8) -> Result<Vec<ForecastDay>> {
        let response = self.fetch_forecast(latitude, longitude, days).await?;
        Ok(wire::normalize_forecast(response))
    }
}

/// WeatherAPI.com response structures and conversion into internal models
pub(crate) mod wire {
    use chrono::NaiveDate;
    use serde::Deserialize;

    use crate::weather::{ForecastDay, MoonPhase, WeatherData, WindName};

    #[derive(Debug, Deserialize)]
    pub struct CurrentResponse {
        pub location: ApiLocation,
        pub current: ApiCurrent,
    }

    #[derive(Debug, Deserialize)]
    pub struct ApiLocation {
        pub name: String,
        pub country: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct ApiCondition {
        pub text: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct ApiCurrent {
        pub temp_c: f64,
        pub condition: ApiCondition,
        pub wind_kph: f64,
        #[serde(default)]
        pub wind_dir: String,
        pub pressure_mb: f64,
        pub humidity: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub forecast: ApiForecast,
    }

    #[derive(Debug, Deserialize)]
    pub struct ApiForecast {
        pub forecastday: Vec<ApiForecastDay>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ApiForecastDay {
        pub date: NaiveDate,
        pub day: ApiDay,
        pub astro: ApiAstro,
    }

    #[derive(Debug, Deserialize)]
    pub struct ApiDay {
        pub maxtemp_c: f64,
        pub mintemp_c: f64,
        pub condition: ApiCondition,
        #[serde(default)]
        pub daily_chance_of_rain: f64,
        pub avghumidity: f64,
        pub maxwind_kph: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct ApiAstro {
        #[serde(default)]
        pub sunrise: String,
        #[serde(default)]
        pub sunset: String,
        pub moon_phase: Option<String>,
        pub moon_illumination: Option<Percentage>,
    }

    /// The provider has sent illumination both as a number and as a string
    #[derive(Debug, Deserialize)]
    #[serde(untagged)]
    pub enum Percentage {
        Number(f64),
        Text(String),
    }

    impl Percentage {
        /// Unparseable text counts as 0
        pub fn value(&self) -> f64 {
            match self {
                Percentage::Number(n) => *n,
                Percentage::Text(t) => t.trim().parse().unwrap_or(0.0),
            }
        }
    }

    impl ApiAstro {
        pub fn illumination(&self) -> f64 {
            self.moon_illumination
                .as_ref()
                .map_or(0.0, Percentage::value)
        }

        /// Provider phase name, or one derived from illumination
        pub fn phase(&self) -> String {
            match self.moon_phase.as_deref().map(str::trim) {
                Some(phase) if !phase.is_empty() => phase.to_string(),
                _ => MoonPhase::from_illumination(self.illumination()).to_string(),
            }
        }
    }

    pub fn normalize_current(response: CurrentResponse, astro: Option<&ApiAstro>) -> WeatherData {
        let CurrentResponse { location, current } = response;
        WeatherData {
            location: format!("{}, {}", location.name, location.country),
            temperature: current.temp_c,
            condition: current.condition.text,
            wind_speed: current.wind_kph,
            wind_direction: current.wind_dir,
            wind_name: WindName::from_speed_kph(current.wind_kph),
            pressure: current.pressure_mb,
            humidity: current.humidity,
            moon_phase: astro.map_or_else(|| "Unknown".to_string(), ApiAstro::phase),
            moon_illumination: astro.map_or(0.0, ApiAstro::illumination),
        }
    }

    pub fn normalize_forecast(response: ForecastResponse) -> Vec<ForecastDay> {
        response
            .forecast
            .forecastday
            .into_iter()
            .map(|day| {
                let moon_phase = day.astro.phase();
                let moon_illumination = day.astro.illumination();
                ForecastDay {
                    date: day.date,
                    max_temp: day.day.maxtemp_c,
                    min_temp: day.day.mintemp_c,
                    condition: day.day.condition.text,
                    chance_of_rain: day.day.daily_chance_of_rain,
                    moon_phase,
                    moon_illumination,
                    sunrise: day.astro.sunrise,
                    sunset: day.astro.sunset,
                    avg_humidity: day.day.avghumidity,
                    max_wind: day.day.maxwind_kph,
                    wind_name: WindName::from_speed_kph(day.day.maxwind_kph),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::wire::*;
    use super::*;
    use crate::weather::WindName;
    use chrono::NaiveDate;

    const FORECAST_JSON: &str = r#"{
        "location": {"name": "London", "region": "City of London", "country": "United Kingdom"},
        "forecast": {"forecastday": [
            {
                "date": "2024-06-01",
                "day": {
                    "maxtemp_c": 22.0, "mintemp_c": 14.0,
                    "condition": {"text": "Sunny"},
                    "daily_chance_of_rain": 20, "avghumidity": 65, "maxwind_kph": 15.1
                },
                "astro": {
                    "sunrise": "04:43 AM", "sunset": "09:11 PM",
                    "moon_phase": "Full Moon", "moon_illumination": "95"
                }
            },
            {
                "date": "2024-06-02",
                "day": {
                    "maxtemp_c": 18.0, "mintemp_c": 9.0,
                    "condition": {"text": "Patchy rain nearby"},
                    "daily_chance_of_rain": 70, "avghumidity": 88, "maxwind_kph": 40.0
                },
                "astro": {"sunrise": "04:42 AM", "sunset": "09:12 PM", "moon_illumination": 30}
            }
        ]}
    }"#;

    const CURRENT_JSON: &str = r#"{
        "location": {"name": "London", "region": "City of London", "country": "United Kingdom"},
        "current": {
            "temp_c": 17.0, "condition": {"text": "Partly cloudy"},
            "wind_kph": 9.0, "wind_dir": "WSW", "pressure_mb": 1016.0, "humidity": 72
        }
    }"#;

    #[test]
    fn test_normalize_forecast() {
        let response: ForecastResponse = serde_json::from_str(FORECAST_JSON).unwrap();
        let days = normalize_forecast(response);

        assert_eq!(days.len(), 2);
        let first = &days[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(first.max_temp, 22.0);
        assert_eq!(first.condition, "Sunny");
        assert_eq!(first.chance_of_rain, 20.0);
        assert_eq!(first.moon_phase, "Full Moon");
        assert_eq!(first.moon_illumination, 95.0);
        assert_eq!(first.sunrise, "04:43 AM");
        assert_eq!(first.wind_name, WindName::GentleBreeze);
    }

    #[test]
    fn test_missing_moon_phase_is_derived_from_illumination() {
        let response: ForecastResponse = serde_json::from_str(FORECAST_JSON).unwrap();
        let days = normalize_forecast(response);

        assert_eq!(days[1].moon_illumination, 30.0);
        assert_eq!(days[1].moon_phase, "First Quarter");
        assert_eq!(days[1].wind_name, WindName::StrongBreeze);
    }

    #[test]
    fn test_normalize_current_with_moon_context() {
        let current: CurrentResponse = serde_json::from_str(CURRENT_JSON).unwrap();
        let forecast: ForecastResponse = serde_json::from_str(FORECAST_JSON).unwrap();
        let astro = forecast.forecast.forecastday.into_iter().next().map(|d| d.astro);

        let weather = normalize_current(current, astro.as_ref());

        assert_eq!(weather.location, "London, United Kingdom");
        assert_eq!(weather.wind_direction, "WSW");
        assert_eq!(weather.wind_name, WindName::LightBreeze);
        assert_eq!(weather.pressure, 1016.0);
        assert_eq!(weather.moon_phase, "Full Moon");
        assert_eq!(weather.moon_illumination, 95.0);
    }

    #[test]
    fn test_normalize_current_without_moon_context() {
        let current: CurrentResponse = serde_json::from_str(CURRENT_JSON).unwrap();
        let weather = normalize_current(current, None);
        assert_eq!(weather.moon_phase, "Unknown");
        assert_eq!(weather.moon_illumination, 0.0);
    }

    #[test]
    fn test_unparseable_illumination_counts_as_zero() {
        assert_eq!(Percentage::Text("n/a".to_string()).value(), 0.0);
        assert_eq!(Percentage::Text(" 42 ".to_string()).value(), 42.0);
    }

    #[test]
    fn test_blank_api_key_is_config_error() {
        let err = WeatherApiClient::new("  ", "https://api.weatherapi.com/v1", Duration::from_secs(5))
            .unwrap_err();
        assert!(matches!(err, FishLogError::Config { .. }));
    }

    #[test]
    fn test_url_shape() {
        let client = WeatherApiClient::new(
            "secret key",
            "https://api.weatherapi.com/v1/",
            Duration::from_secs(5),
        )
        .unwrap();
        let url = client.url("forecast", 51.5, -0.09, "&days=7");
        assert_eq!(
            url,
            "https://api.weatherapi.com/v1/forecast.json?key=secret%20key&q=51.5,-0.09&aqi=no&days=7"
        );
    }
}

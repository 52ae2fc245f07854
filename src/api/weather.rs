use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiQuery, AppState, CoordinatesQuery};
use crate::coordinates::{self, FormattedCoordinates};
use crate::fishing::FishingPrediction;
use crate::weather::{ForecastDay, WeatherData};

const PREDICTIONS_UNAVAILABLE: &str = "Unable to fetch weather predictions. Please try again later.";

pub async fn current_weather(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CoordinatesQuery>,
) -> Result<Json<Option<WeatherData>>, ApiError> {
    query.validate()?;
    let gateway = state.gateway()?;
    Ok(Json(gateway.current_weather(query.lat, query.lon).await))
}

pub async fn forecast(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CoordinatesQuery>,
) -> Result<Json<Vec<ForecastDay>>, ApiError> {
    query.validate()?;
    let gateway = state.gateway()?;
    Ok(Json(gateway.forecast(query.lat, query.lon).await))
}

#[derive(Debug, Deserialize)]
pub struct PredictionsQuery {
    pub lat: f64,
    pub lon: f64,
    pub client: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionsResponse {
    pub predictions: Vec<FishingPrediction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<Vec<FishingPrediction>> for PredictionsResponse {
    fn from(predictions: Vec<FishingPrediction>) -> Self {
        let message = predictions
            .is_empty()
            .then(|| PREDICTIONS_UNAVAILABLE.to_string());
        Self {
            predictions,
            message,
        }
    }
}

pub async fn predictions(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PredictionsQuery>,
) -> Result<Json<PredictionsResponse>, ApiError> {
    CoordinatesQuery {
        lat: query.lat,
        lon: query.lon,
    }
    .validate()?;
    let gateway = state.gateway()?;
    let request = gateway.fishing_predictions(query.lat, query.lon);

    let predictions = match query.client.as_deref().filter(|c| !c.is_empty()) {
        Some(client) => state
            .sequencer
            .run(client, request)
            .await
            .ok_or(ApiError::Superseded)?,
        None => request.await,
    };
    Ok(Json(predictions.into()))
}

pub async fn format_coordinates(
    ApiQuery(query): ApiQuery<CoordinatesQuery>,
) -> Result<Json<FormattedCoordinates>, ApiError> {
    query.validate()?;
    Ok(Json(coordinates::format_coordinates(query.lat, query.lon)))
}

#[derive(Debug, Deserialize)]
pub struct ParseQuery {
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ParseResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub async fn parse_coordinate(ApiQuery(query): ApiQuery<ParseQuery>) -> Json<ParseResponse> {
    let response = match coordinates::from_display(&query.value) {
        Ok(decimal) => ParseResponse {
            valid: true,
            decimal: Some(decimal),
            error: None,
        },
        Err(err) => ParseResponse {
            valid: false,
            decimal: None,
            error: Some(err.to_string()),
        },
    };
    Json(response)
}

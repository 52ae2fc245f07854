//! HTTP API served under `/api`

mod extract;
mod log;
mod weather;

pub use extract::{ApiJson, ApiQuery};

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::error;

use crate::sequencer::RequestSequencer;
use crate::store::LogStore;
use crate::weather::WeatherGateway;
use crate::FishLogError;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    /// `None` when no weather API key is configured
    pub gateway: Option<WeatherGateway>,
    pub store: Arc<LogStore>,
    pub sequencer: Arc<RequestSequencer>,
}

impl AppState {
    pub fn new(gateway: Option<WeatherGateway>, store: LogStore) -> Self {
        Self {
            gateway,
            store: Arc::new(store),
            sequencer: Arc::new(RequestSequencer::new()),
        }
    }

    fn gateway(&self) -> Result<&WeatherGateway, ApiError> {
        self.gateway
            .as_ref()
            .ok_or_else(|| FishLogError::config("No weather API key configured").into())
    }
}

#[derive(Debug)]
pub enum ApiError {
    Log(FishLogError),
    NotFound(String),
    /// A later request from the same client replaced this one
    Superseded,
    /// Body or query string the extractors could not decode
    Rejected { status: StatusCode, message: String },
}

impl From<FishLogError> for ApiError {
    fn from(err: FishLogError) -> Self {
        ApiError::Log(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Log(err) => {
                let status = match err {
                    FishLogError::Validation { .. } | FishLogError::Parse(_) => {
                        StatusCode::BAD_REQUEST
                    }
                    FishLogError::Config { .. } => StatusCode::SERVICE_UNAVAILABLE,
                    FishLogError::Fetch { .. } => StatusCode::BAD_GATEWAY,
                    FishLogError::Store { .. } | FishLogError::Io { .. } => {
                        error!("Request failed: {err}");
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, err.user_message())
            }
            ApiError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            ApiError::Superseded => (
                StatusCode::CONFLICT,
                "Superseded by a newer request".to_string(),
            ),
            ApiError::Rejected { status, message } => (*status, message.clone()),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct CoordinatesQuery {
    pub lat: f64,
    pub lon: f64,
}

impl CoordinatesQuery {
    fn validate(&self) -> Result<(), ApiError> {
        if !(-90.0..=90.0).contains(&self.lat) || !(-180.0..=180.0).contains(&self.lon) {
            return Err(FishLogError::validation(format!(
                "Coordinates ({}, {}) are out of range",
                self.lat, self.lon
            ))
            .into());
        }
        Ok(())
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/weather/current", get(weather::current_weather))
        .route("/weather/forecast", get(weather::forecast))
        .route("/predictions", get(weather::predictions))
        .route("/coordinates/format", get(weather::format_coordinates))
        .route("/coordinates/parse", get(weather::parse_coordinate))
        .route("/locations", get(log::list_locations).post(log::save_location))
        .route("/locations/{id}", delete(log::delete_location))
        .route("/trips", get(log::list_trips).post(log::save_trip))
        .route("/trips/species", get(log::unique_species))
        .route("/trips/export.csv", get(log::export_trips))
        .route("/trips/{id}", delete(log::delete_trip))
        .with_state(state)
}

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;

use super::{ApiError, ApiJson, AppState};
use crate::export::export_trips_csv;
use crate::models::{FishingTrip, NewLocation, NewTrip, SavedLocation};

pub async fn list_locations(
    State(state): State<AppState>,
) -> Result<Json<Vec<SavedLocation>>, ApiError> {
    Ok(Json(state.store.list_locations().await?))
}

pub async fn save_location(
    State(state): State<AppState>,
    ApiJson(location): ApiJson<NewLocation>,
) -> Result<(StatusCode, Json<SavedLocation>), ApiError> {
    let saved = state.store.save_location(location).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn delete_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.store.delete_location(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Location {id}")))
    }
}

pub async fn list_trips(
    State(state): State<AppState>,
) -> Result<Json<Vec<FishingTrip>>, ApiError> {
    Ok(Json(state.store.list_trips().await?))
}

pub async fn save_trip(
    State(state): State<AppState>,
    ApiJson(trip): ApiJson<NewTrip>,
) -> Result<(StatusCode, Json<FishingTrip>), ApiError> {
    let saved = state.store.save_trip(trip).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn delete_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.store.delete_trip(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Trip {id}")))
    }
}

pub async fn unique_species(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.store.unique_species().await?))
}

pub async fn export_trips(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let trips = state.store.list_trips().await?;
    let locations = state.store.list_locations().await?;
    let csv = export_trips_csv(&trips, &locations)?;
    let disposition = format!(
        "attachment; filename=\"fishing-trips-{}.csv\"",
        Utc::now().format("%Y-%m-%d")
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}

//! CSV export of the trip log

use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Display;

use crate::models::{FishingTrip, SavedLocation};
use crate::{FishLogError, Result};

const MISSING: &str = "N/A";
const UNKNOWN_LOCATION: &str = "Unknown";

#[derive(Debug, Serialize)]
struct TripRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Time")]
    time: String,
    #[serde(rename = "Location")]
    location: String,
    #[serde(rename = "Species")]
    species: String,
    #[serde(rename = "Quantity")]
    quantity: u32,
    #[serde(rename = "Size (cm)")]
    size: String,
    #[serde(rename = "Weight (kg)")]
    weight: String,
    #[serde(rename = "Temperature (°C)")]
    temperature: String,
    #[serde(rename = "Wind Speed (km/h)")]
    wind: String,
    #[serde(rename = "Pressure (hPa)")]
    pressure: String,
    #[serde(rename = "Moon Phase")]
    moon_phase: String,
    #[serde(rename = "Water Conditions")]
    water_conditions: String,
    #[serde(rename = "Notes")]
    notes: String,
}

fn or_missing<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| v.to_string())
}

impl TripRow {
    fn new(trip: &FishingTrip, location_names: &HashMap<&str, &str>) -> Self {
        let location = match trip.location_id.as_deref() {
            Some(id) => location_names
                .get(id)
                .copied()
                .unwrap_or(UNKNOWN_LOCATION)
                .to_string(),
            None => MISSING.to_string(),
        };

        Self {
            date: trip.trip_date.format("%Y-%m-%d").to_string(),
            time: trip.trip_time.format("%H:%M").to_string(),
            location,
            species: or_missing(trip.catch_species.as_deref()),
            quantity: trip.catch_quantity,
            size: or_missing(trip.catch_size),
            weight: or_missing(trip.catch_weight),
            temperature: or_missing(trip.weather_temp),
            wind: or_missing(trip.weather_wind),
            pressure: or_missing(trip.weather_pressure),
            moon_phase: or_missing(trip.moon_phase.as_deref()),
            water_conditions: or_missing(trip.water_conditions.as_deref()),
            notes: or_missing(trip.notes.as_deref()),
        }
    }
}

/// Render trips as CSV, resolving location ids against `locations`
pub fn export_trips_csv(trips: &[FishingTrip], locations: &[SavedLocation]) -> Result<String> {
    if trips.is_empty() {
        return Err(FishLogError::validation("No trips to export"));
    }

    let location_names: HashMap<&str, &str> = locations
        .iter()
        .map(|l| (l.id.as_str(), l.name.as_str()))
        .collect();

    let mut wtr = csv::Writer::from_writer(vec![]);
    for trip in trips {
        wtr.serialize(TripRow::new(trip, &location_names))
            .map_err(|e| FishLogError::store(format!("CSV serialization error: {e}")))?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| FishLogError::store(format!("CSV writer error: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| FishLogError::store(format!("UTF-8 conversion error: {e}")))
}

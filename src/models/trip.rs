use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{FishLogError, Result};

/// One logged fishing trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FishingTrip {
    pub id: String,
    pub location_id: Option<String>,
    pub trip_date: NaiveDate,
    pub trip_time: NaiveTime,
    /// Air temperature in Celsius
    pub weather_temp: Option<f64>,
    /// Wind speed in km/h
    pub weather_wind: Option<f64>,
    /// Pressure in hPa
    pub weather_pressure: Option<f64>,
    pub moon_phase: Option<String>,
    pub catch_species: Option<String>,
    pub catch_quantity: u32,
    /// Size in cm
    pub catch_size: Option<f64>,
    /// Weight in kg
    pub catch_weight: Option<f64>,
    pub water_conditions: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields a client supplies when logging a trip
#[derive(Debug, Clone, Deserialize)]
pub struct NewTrip {
    pub location_id: Option<String>,
    pub trip_date: NaiveDate,
    pub trip_time: NaiveTime,
    pub weather_temp: Option<f64>,
    pub weather_wind: Option<f64>,
    pub weather_pressure: Option<f64>,
    pub moon_phase: Option<String>,
    pub catch_species: Option<String>,
    #[serde(default)]
    pub catch_quantity: u32,
    pub catch_size: Option<f64>,
    pub catch_weight: Option<f64>,
    pub water_conditions: Option<String>,
    pub notes: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl NewTrip {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("catch_size", self.catch_size), ("catch_weight", self.catch_weight)] {
            if value.is_some_and(|v| v < 0.0) {
                return Err(FishLogError::validation(format!("{field} cannot be negative")));
            }
        }
        if self.weather_wind.is_some_and(|v| v < 0.0) {
            return Err(FishLogError::validation("weather_wind cannot be negative"));
        }
        Ok(())
    }

    pub fn into_trip(self) -> Result<FishingTrip> {
        self.validate()?;
        Ok(FishingTrip {
            id: Uuid::new_v4().to_string(),
            location_id: non_blank(self.location_id),
            trip_date: self.trip_date,
            trip_time: self.trip_time,
            weather_temp: self.weather_temp,
            weather_wind: self.weather_wind,
            weather_pressure: self.weather_pressure,
            moon_phase: non_blank(self.moon_phase),
            catch_species: non_blank(self.catch_species),
            catch_quantity: self.catch_quantity,
            catch_size: self.catch_size,
            catch_weight: self.catch_weight,
            water_conditions: non_blank(self.water_conditions),
            notes: non_blank(self.notes),
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn new_trip(date: &str, species: Option<&str>) -> NewTrip {
        NewTrip {
            location_id: None,
            trip_date: date.parse().unwrap(),
            trip_time: NaiveTime::from_hms_opt(6, 30, 0).unwrap(),
            weather_temp: Some(16.5),
            weather_wind: Some(12.0),
            weather_pressure: None,
            moon_phase: Some("Full Moon".to_string()),
            catch_species: species.map(str::to_string),
            catch_quantity: 2,
            catch_size: Some(42.0),
            catch_weight: None,
            water_conditions: None,
            notes: Some("  ".to_string()),
        }
    }

    #[test]
    fn test_into_trip_normalizes_blank_text() {
        let trip = new_trip("2024-06-01", Some(" Pike ")).into_trip().unwrap();
        assert_eq!(trip.catch_species.as_deref(), Some("Pike"));
        assert!(trip.notes.is_none());
        assert_eq!(trip.catch_quantity, 2);
    }

    #[test]
    fn test_negative_measurements_are_rejected() {
        let mut trip = new_trip("2024-06-01", None);
        trip.catch_weight = Some(-1.0);
        assert!(matches!(trip.validate(), Err(FishLogError::Validation { .. })));
    }

    #[test]
    fn test_new_trip_from_json() {
        let trip: NewTrip = serde_json::from_str(
            r#"{"location_id": null, "trip_date": "2024-06-01", "trip_time": "05:45:00",
                "weather_temp": 14.0, "weather_wind": null, "weather_pressure": 1012.0,
                "moon_phase": null, "catch_species": "Carp", "catch_size": null,
                "catch_weight": 3.2, "water_conditions": "Murky", "notes": null}"#,
        )
        .unwrap();
        assert_eq!(trip.catch_quantity, 0);
        assert_eq!(trip.trip_time, NaiveTime::from_hms_opt(5, 45, 0).unwrap());
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::coordinates::{FormattedCoordinates, format_coordinates};
use crate::{FishLogError, Result};

/// A favorite fishing spot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedLocation {
    pub id: String,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields a client supplies when saving a location
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewLocation {
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: Option<String>,
}

impl NewLocation {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(FishLogError::validation("Location name cannot be empty"));
        }
        if let Some(latitude) = self.latitude {
            if !(-90.0..=90.0).contains(&latitude) {
                return Err(FishLogError::validation(format!(
                    "Latitude {latitude} is outside -90..90"
                )));
            }
        }
        if let Some(longitude) = self.longitude {
            if !(-180.0..=180.0).contains(&longitude) {
                return Err(FishLogError::validation(format!(
                    "Longitude {longitude} is outside -180..180"
                )));
            }
        }
        if self.latitude.is_some() != self.longitude.is_some() {
            return Err(FishLogError::validation(
                "Latitude and longitude must be given together",
            ));
        }
        Ok(())
    }

    pub fn into_location(self) -> Result<SavedLocation> {
        self.validate()?;
        Ok(SavedLocation {
            id: Uuid::new_v4().to_string(),
            name: self.name.trim().to_string(),
            latitude: self.latitude,
            longitude: self.longitude,
            description: self.description.filter(|d| !d.trim().is_empty()),
            created_at: Utc::now(),
        })
    }
}

impl SavedLocation {
    /// Coordinates in `DD°MM.MMM′H` notation, if the spot has any
    #[must_use]
    pub fn display_coordinates(&self) -> Option<FormattedCoordinates> {
        Some(format_coordinates(self.latitude?, self.longitude?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_location(latitude: Option<f64>, longitude: Option<f64>) -> NewLocation {
        NewLocation {
            name: "Thames Barrier".to_string(),
            latitude,
            longitude,
            description: Some("  ".to_string()),
        }
    }

    #[test]
    fn test_into_location() {
        let location = new_location(Some(51.5), Some(-0.09)).into_location().unwrap();
        assert!(!location.id.is_empty());
        assert_eq!(location.name, "Thames Barrier");
        assert!(location.description.is_none());

        let display = location.display_coordinates().unwrap();
        assert_eq!(display.latitude, "51°30.000′N");
        assert_eq!(display.longitude, "0°5.400′W");
    }

    #[test]
    fn test_location_without_coordinates() {
        let location = new_location(None, None).into_location().unwrap();
        assert!(location.display_coordinates().is_none());
    }

    #[test]
    fn test_validation() {
        assert!(new_location(Some(91.0), Some(0.0)).validate().is_err());
        assert!(new_location(Some(0.0), Some(-181.0)).validate().is_err());
        assert!(new_location(Some(10.0), None).validate().is_err());

        let mut unnamed = new_location(None, None);
        unnamed.name = " ".to_string();
        assert!(unnamed.validate().is_err());
    }
}

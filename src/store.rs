//! Trip and location persistence
//!
//! Records live in a single fjall keyspace, encoded with postcard. Each record
//! kind keeps an id index so listing does not need to scan the keyspace.
//! Writes are last-write-wins.

use serde::{Serialize, de::DeserializeOwned};
use std::collections::BTreeSet;
use std::fmt::Display;
use std::path::Path;
use tokio::sync::Mutex;
use tokio::task;
use tracing::{debug, info, instrument};

use crate::models::{FishingTrip, NewLocation, NewTrip, SavedLocation};
use crate::{FishLogError, Result};

const LOCATION_PREFIX: &str = "location:";
const TRIP_PREFIX: &str = "trip:";
const LOCATION_INDEX: &str = "index:locations";
const TRIP_INDEX: &str = "index:trips";

fn store_err(err: impl Display) -> FishLogError {
    FishLogError::store(err.to_string())
}

fn get_from_store(store: fjall::Keyspace, key: Vec<u8>) -> Result<Option<Vec<u8>>> {
    Ok(store.get(key).map_err(store_err)?.map(|v| v.to_vec()))
}

pub struct LogStore {
    _db: fjall::Database,
    store: fjall::Keyspace,
    /// Serializes index read-modify-write cycles
    index_lock: Mutex<()>,
}

impl LogStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)?;
        let db = fjall::Database::builder(path).open().map_err(store_err)?;
        let store = db
            .keyspace("fishlog", fjall::KeyspaceCreateOptions::default)
            .map_err(store_err)?;
        info!("Opened fishing log store at {}", path.display());
        Ok(Self {
            _db: db,
            store,
            index_lock: Mutex::new(()),
        })
    }

    async fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        let bytes = postcard::to_stdvec(value).map_err(store_err)?;
        task::spawn_blocking(move || store.insert(key, bytes))
            .await
            .map_err(store_err)?
            .map_err(store_err)?;
        Ok(())
    }

    async fn get<T: DeserializeOwned + Send + 'static>(&self, key: &str) -> Result<Option<T>> {
        let store = self.store.clone();
        let key_bytes = key.as_bytes().to_vec();
        let maybe_bytes = task::spawn_blocking(move || get_from_store(store, key_bytes))
            .await
            .map_err(store_err)??;

        match maybe_bytes {
            Some(bytes) => Ok(Some(postcard::from_bytes(&bytes).map_err(store_err)?)),
            None => {
                debug!("Key not found: {key}");
                Ok(None)
            }
        }
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        task::spawn_blocking(move || store.remove(key))
            .await
            .map_err(store_err)?
            .map_err(store_err)?;
        Ok(())
    }

    async fn index(&self, index: &str) -> Result<Vec<String>> {
        Ok(self.get::<Vec<String>>(index).await?.unwrap_or_default())
    }

    async fn save_record<T: Serialize>(
        &self,
        index: &str,
        prefix: &str,
        id: &str,
        record: &T,
    ) -> Result<()> {
        let _guard = self.index_lock.lock().await;
        self.put(&format!("{prefix}{id}"), record).await?;
        let mut ids = self.index(index).await?;
        if !ids.iter().any(|existing| existing == id) {
            ids.push(id.to_string());
            self.put(index, &ids).await?;
        }
        Ok(())
    }

    async fn delete_record(&self, index: &str, prefix: &str, id: &str) -> Result<bool> {
        let _guard = self.index_lock.lock().await;
        let mut ids = self.index(index).await?;
        let before = ids.len();
        ids.retain(|existing| existing != id);
        if ids.len() == before {
            return Ok(false);
        }
        self.remove(&format!("{prefix}{id}")).await?;
        self.put(index, &ids).await?;
        Ok(true)
    }

    async fn list_records<T: DeserializeOwned + Send + 'static>(
        &self,
        index: &str,
        prefix: &str,
    ) -> Result<Vec<T>> {
        let ids = self.index(index).await?;
        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(record) = self.get(&format!("{prefix}{id}")).await? {
                records.push(record);
            }
        }
        Ok(records)
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn save_location(&self, location: NewLocation) -> Result<SavedLocation> {
        let location = location.into_location()?;
        self.put_location(&location).await?;
        Ok(location)
    }

    /// Insert or overwrite a location as-is
    pub async fn put_location(&self, location: &SavedLocation) -> Result<()> {
        self.save_record(LOCATION_INDEX, LOCATION_PREFIX, &location.id, location)
            .await
    }

    pub async fn get_location(&self, id: &str) -> Result<Option<SavedLocation>> {
        self.get(&format!("{LOCATION_PREFIX}{id}")).await
    }

    /// Locations sorted by name
    pub async fn list_locations(&self) -> Result<Vec<SavedLocation>> {
        let mut locations: Vec<SavedLocation> =
            self.list_records(LOCATION_INDEX, LOCATION_PREFIX).await?;
        locations.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(locations)
    }

    /// Returns whether a location was removed
    #[instrument(level = "debug", skip(self))]
    pub async fn delete_location(&self, id: &str) -> Result<bool> {
        self.delete_record(LOCATION_INDEX, LOCATION_PREFIX, id).await
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn save_trip(&self, trip: NewTrip) -> Result<FishingTrip> {
        if let Some(location_id) = trip.location_id.as_deref().filter(|id| !id.trim().is_empty()) {
            if self.get_location(location_id).await?.is_none() {
                return Err(FishLogError::validation(format!(
                    "Unknown location '{location_id}'"
                )));
            }
        }
        let trip = trip.into_trip()?;
        self.put_trip(&trip).await?;
        Ok(trip)
    }

    /// Insert or overwrite a trip as-is
    pub async fn put_trip(&self, trip: &FishingTrip) -> Result<()> {
        self.save_record(TRIP_INDEX, TRIP_PREFIX, &trip.id, trip).await
    }

    pub async fn get_trip(&self, id: &str) -> Result<Option<FishingTrip>> {
        self.get(&format!("{TRIP_PREFIX}{id}")).await
    }

    /// Trips, most recent first
    pub async fn list_trips(&self) -> Result<Vec<FishingTrip>> {
        let mut trips: Vec<FishingTrip> = self.list_records(TRIP_INDEX, TRIP_PREFIX).await?;
        trips.sort_by(|a, b| {
            (b.trip_date, b.trip_time).cmp(&(a.trip_date, a.trip_time))
        });
        Ok(trips)
    }

    /// Returns whether a trip was removed
    #[instrument(level = "debug", skip(self))]
    pub async fn delete_trip(&self, id: &str) -> Result<bool> {
        self.delete_record(TRIP_INDEX, TRIP_PREFIX, id).await
    }

    /// Distinct species across all trips, sorted
    pub async fn unique_species(&self) -> Result<Vec<String>> {
        let species: BTreeSet<String> = self
            .list_trips()
            .await?
            .into_iter()
            .filter_map(|trip| trip.catch_species)
            .filter(|s| !s.is_empty())
            .collect();
        Ok(species.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trip::tests::new_trip;
    use tempfile::TempDir;

    fn open_store() -> (TempDir, LogStore) {
        let dir = TempDir::new().unwrap();
        let store = LogStore::open(dir.path().join("db")).unwrap();
        (dir, store)
    }

    fn new_location(name: &str) -> NewLocation {
        NewLocation {
            name: name.to_string(),
            latitude: Some(51.5),
            longitude: Some(-0.09),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_location_round_trip() {
        let (_dir, store) = open_store();
        let saved = store.save_location(new_location("Lea Valley")).await.unwrap();

        let loaded = store.get_location(&saved.id).await.unwrap();
        assert_eq!(loaded, Some(saved.clone()));

        assert!(store.delete_location(&saved.id).await.unwrap());
        assert!(!store.delete_location(&saved.id).await.unwrap());
        assert!(store.get_location(&saved.id).await.unwrap().is_none());
        assert!(store.list_locations().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_locations_sorted_by_name() {
        let (_dir, store) = open_store();
        store.save_location(new_location("walthamstow")).await.unwrap();
        store.save_location(new_location("Chew Valley")).await.unwrap();

        let names: Vec<String> = store
            .list_locations()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["Chew Valley", "walthamstow"]);
    }

    #[tokio::test]
    async fn test_trips_newest_first() {
        let (_dir, store) = open_store();
        store.save_trip(new_trip("2024-05-01", Some("Perch"))).await.unwrap();
        store.save_trip(new_trip("2024-06-10", Some("Pike"))).await.unwrap();
        store.save_trip(new_trip("2024-05-20", None)).await.unwrap();

        let dates: Vec<String> = store
            .list_trips()
            .await
            .unwrap()
            .iter()
            .map(|t| t.trip_date.to_string())
            .collect();
        assert_eq!(dates, vec!["2024-06-10", "2024-05-20", "2024-05-01"]);
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let (_dir, store) = open_store();
        let mut trip = store.save_trip(new_trip("2024-05-01", Some("Perch"))).await.unwrap();
        trip.catch_quantity = 7;
        store.put_trip(&trip).await.unwrap();

        let trips = store.list_trips().await.unwrap();
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].catch_quantity, 7);
    }

    #[tokio::test]
    async fn test_unknown_location_is_rejected() {
        let (_dir, store) = open_store();
        let mut trip = new_trip("2024-05-01", None);
        trip.location_id = Some("missing".to_string());
        let err = store.save_trip(trip).await.unwrap_err();
        assert!(matches!(err, FishLogError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_unique_species() {
        let (_dir, store) = open_store();
        for species in [Some("Pike"), Some("Carp"), Some("Pike"), None] {
            store.save_trip(new_trip("2024-05-01", species)).await.unwrap();
        }
        assert_eq!(store.unique_species().await.unwrap(), vec!["Carp", "Pike"]);
    }

    #[tokio::test]
    async fn test_reopen_keeps_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db");
        let id = {
            let store = LogStore::open(&path).unwrap();
            store.save_location(new_location("Rutland Water")).await.unwrap().id
        };
        let store = LogStore::open(&path).unwrap();
        assert!(store.get_location(&id).await.unwrap().is_some());
    }
}

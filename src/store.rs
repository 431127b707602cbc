//! Whole-collection persistence of trips and waybills on top of a blob store
//!
//! Every write replaces a full collection. Two processes writing the same
//! database concurrently can lose each other's updates; nothing guards that.

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::models::{AppMeta, Trip, Waybill};
use crate::seed::SeedData;

pub const TRIPS_KEY: &str = "trips";
pub const WAYBILLS_KEY: &str = "waybills";
pub const META_KEY: &str = "passengersData";

/// String-keyed store of string blobs
#[allow(async_fn_in_trait)]
pub trait BlobStore {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: String) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Process-local blob store
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, String>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.blobs.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.blobs.write().await.remove(key);
        Ok(())
    }
}

/// Typed access to the persisted collections
pub struct RecordStore<S> {
    blobs: S,
}

impl<S: BlobStore> RecordStore<S> {
    pub fn new(blobs: S) -> Self {
        Self { blobs }
    }

    pub fn blobs(&self) -> &S {
        &self.blobs
    }

    /// Missing or unreadable collections come back empty
    async fn load_collection<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        let Some(raw) = self.blobs.get(key).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(items) => Ok(items),
            Err(e) => {
                warn!(key, error = %e, "stored collection is unreadable, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    async fn save_collection<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        let raw = serde_json::to_string(items)
            .with_context(|| format!("failed to serialize {}", key))?;
        self.blobs.set(key, raw).await
    }

    pub async fn load_trips(&self) -> Result<Vec<Trip>> {
        self.load_collection(TRIPS_KEY).await
    }

    pub async fn save_trips(&self, trips: &[Trip]) -> Result<()> {
        self.save_collection(TRIPS_KEY, trips).await
    }

    pub async fn load_waybills(&self) -> Result<Vec<Waybill>> {
        self.load_collection(WAYBILLS_KEY).await
    }

    pub async fn save_waybills(&self, waybills: &[Waybill]) -> Result<()> {
        self.save_collection(WAYBILLS_KEY, waybills).await
    }

    /// Replace the waybill with the same id in place, or append it.
    /// Returns `true` when the waybill was new.
    pub async fn upsert_waybill(&self, waybill: Waybill) -> Result<bool> {
        let mut waybills = self.load_waybills().await?;
        let inserted = match waybills.iter_mut().find(|w| w.id == waybill.id) {
            Some(existing) => {
                *existing = waybill;
                false
            }
            None => {
                waybills.push(waybill);
                true
            }
        };
        self.save_waybills(&waybills).await?;
        Ok(inserted)
    }

    /// Returns `true` when a waybill was removed
    pub async fn delete_waybill(&self, id: &str) -> Result<bool> {
        let mut waybills = self.load_waybills().await?;
        let before = waybills.len();
        waybills.retain(|w| w.id != id);
        if waybills.len() == before {
            return Ok(false);
        }
        self.save_waybills(&waybills).await?;
        Ok(true)
    }

    pub async fn load_meta(&self) -> Result<Option<AppMeta>> {
        let Some(raw) = self.blobs.get(META_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(meta) => Ok(Some(meta)),
            Err(e) => {
                warn!(error = %e, "stored metadata is unreadable");
                Ok(None)
            }
        }
    }

    /// Drop every collection and the metadata marker, so the next
    /// `seed_if_absent` writes the demo fleet again
    pub async fn reset(&self) -> Result<()> {
        for key in [META_KEY, WAYBILLS_KEY, TRIPS_KEY] {
            self.blobs.remove(key).await?;
        }
        info!("Store cleared");
        Ok(())
    }

    /// Write the seed collections unless the metadata marker already exists.
    /// Returns `true` when seeding happened.
    pub async fn seed_if_absent(&self, seed: &SeedData) -> Result<bool> {
        if self.blobs.get(META_KEY).await?.is_some() {
            return Ok(false);
        }

        info!(
            "Seeding store with {} trips and {} waybills",
            seed.trips.len(),
            seed.waybills.len()
        );
        let meta = serde_json::to_string(&seed.meta).context("failed to serialize metadata")?;
        self.blobs.set(META_KEY, meta).await?;
        self.save_waybills(&seed.waybills).await?;
        self.save_trips(&seed.trips).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn waybill(id: &str, passengers: u32) -> Waybill {
        Waybill {
            id: id.to_string(),
            trip_id: "trip-1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            passengers,
            fare: 800.0,
            revenue: f64::from(passengers) * 800.0,
            notes: "on schedule".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_empty_store_reads_empty() {
        let store = RecordStore::new(MemoryBlobStore::new());
        assert!(store.load_trips().await.unwrap().is_empty());
        assert!(store.load_waybills().await.unwrap().is_empty());
        assert!(store.load_meta().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unparseable_collection_reads_empty() {
        let store = RecordStore::new(MemoryBlobStore::new());
        store.blobs().set(WAYBILLS_KEY, "{not json".to_string()).await.unwrap();
        assert!(store.load_waybills().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_waybills_round_trip() {
        let store = RecordStore::new(MemoryBlobStore::new());
        let waybills = vec![waybill("wb-2", 45), waybill("wb-1", 32), waybill("wb-3", 0)];
        store.save_waybills(&waybills).await.unwrap();
        assert_eq!(store.load_waybills().await.unwrap(), waybills);
    }

    #[tokio::test]
    async fn test_upsert_replaces_in_place() {
        let store = RecordStore::new(MemoryBlobStore::new());
        store
            .save_waybills(&[waybill("wb-1", 10), waybill("wb-2", 20)])
            .await
            .unwrap();

        let inserted = store.upsert_waybill(waybill("wb-1", 11)).await.unwrap();
        assert!(!inserted);
        let inserted = store.upsert_waybill(waybill("wb-3", 30)).await.unwrap();
        assert!(inserted);

        let loaded = store.load_waybills().await.unwrap();
        let summary: Vec<(&str, u32)> = loaded.iter().map(|w| (w.id.as_str(), w.passengers)).collect();
        assert_eq!(summary, vec![("wb-1", 11), ("wb-2", 20), ("wb-3", 30)]);
    }

    #[tokio::test]
    async fn test_delete_waybill() {
        let store = RecordStore::new(MemoryBlobStore::new());
        store
            .save_waybills(&[waybill("wb-1", 10), waybill("wb-2", 20)])
            .await
            .unwrap();

        assert!(store.delete_waybill("wb-1").await.unwrap());
        assert!(!store.delete_waybill("wb-1").await.unwrap());
        let ids: Vec<String> = store
            .load_waybills()
            .await
            .unwrap()
            .into_iter()
            .map(|w| w.id)
            .collect();
        assert_eq!(ids, vec!["wb-2"]);
    }

    #[tokio::test]
    async fn test_seed_only_once() {
        let store = RecordStore::new(MemoryBlobStore::new());
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let data = seed::mock_data(now.naive_utc());

        assert!(store.seed_if_absent(&data).await.unwrap());
        assert_eq!(store.load_trips().await.unwrap().len(), 8);
        assert_eq!(store.load_waybills().await.unwrap().len(), 10);

        store.delete_waybill("wb-1").await.unwrap();
        assert!(!store.seed_if_absent(&data).await.unwrap());
        assert_eq!(store.load_waybills().await.unwrap().len(), 9);
        assert_eq!(store.load_meta().await.unwrap(), Some(data.meta.clone()));
    }

    #[tokio::test]
    async fn test_reset_allows_reseeding() {
        let store = RecordStore::new(MemoryBlobStore::new());
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap().naive_utc();
        let data = seed::mock_data(now);
        store.seed_if_absent(&data).await.unwrap();
        store.delete_waybill("wb-1").await.unwrap();

        store.reset().await.unwrap();
        assert!(store.load_waybills().await.unwrap().is_empty());
        assert!(store.load_meta().await.unwrap().is_none());

        assert!(store.seed_if_absent(&data).await.unwrap());
        assert_eq!(store.load_waybills().await.unwrap().len(), 10);
    }
}

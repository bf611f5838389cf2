use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{BandStore, StoreError};
use crate::models::{Band, CreateBand};

/// An in-memory store keeping records in insertion order. Backs the
/// offline integration suite and the `memory` backend.
pub struct MemoryStore {
    bands: RwLock<Vec<Band>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            bands: RwLock::new(Vec::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BandStore for MemoryStore {
    async fn create(&self, band: &CreateBand) -> Result<Band, StoreError> {
        let now = Utc::now();
        let record = Band {
            id: Uuid::new_v4().to_string(),
            name: band.name.clone(),
            members: band.members.clone(),
            albums: band.albums,
            created_at: now,
            updated_at: now,
        };
        self.bands
            .write()
            .map_err(|_| StoreError::Backend("band list lock poisoned".to_string()))?
            .push(record.clone());
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<Band>, StoreError> {
        Ok(self
            .bands
            .read()
            .map_err(|_| StoreError::Backend("band list lock poisoned".to_string()))?
            .clone())
    }

    async fn delete(&self, id: &str) -> Result<u64, StoreError> {
        let mut bands = self
            .bands
            .write()
            .map_err(|_| StoreError::Backend("band list lock poisoned".to_string()))?;
        let before = bands.len();
        bands.retain(|band| band.id != id);
        Ok((before - bands.len()) as u64)
    }
}

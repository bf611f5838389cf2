use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info};

use super::memory_store::MemoryStore;
use super::mongodb_store::MongoDBStore;
use crate::config::{StoreBackend, StoreConfig};
use crate::models::{Band, CreateBand};

/// Errors from the storage layer. Handlers map these to 5xx responses;
/// they are never fatal to the process once the server is up.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store operation failed: {0}")]
    Backend(String),
}

/// The BandStore trait abstracts band persistence (create, list, delete).
#[async_trait]
pub trait BandStore: Send + Sync {
    /// Persists a new record, assigning its id and timestamps.
    async fn create(&self, band: &CreateBand) -> Result<Band, StoreError>;

    /// Returns all records.
    async fn list(&self) -> Result<Vec<Band>, StoreError>;

    /// Deletes by id, returning how many records were removed. An unknown
    /// id removes nothing and is not an error.
    async fn delete(&self, id: &str) -> Result<u64, StoreError>;
}

/// Creates a concrete store implementation based on the StoreConfig.
///
/// A service without a database to talk to cannot do anything useful, so a
/// missing or unusable backend configuration terminates the process before
/// the server starts listening.
pub async fn create_store(config: &StoreConfig) -> Arc<dyn BandStore> {
    match &config.backend {
        Some(StoreBackend::MongoDB(mongo_config)) => match MongoDBStore::new(mongo_config).await {
            Ok(store) => {
                info!("Successfully created MongoDB store.");
                Arc::new(store)
            }
            Err(e) => {
                error!("Failed to create MongoDB store: {}", e);
                std::process::exit(1);
            }
        },
        Some(StoreBackend::Memory) => {
            info!("Using in-memory band store; records will not survive a restart.");
            Arc::new(MemoryStore::new())
        }
        None => {
            error!("No store backend configured. Set DATABASE_URI or store.backend in config.yaml.");
            std::process::exit(1);
        }
    }
}

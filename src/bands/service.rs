use std::sync::Arc;

use thiserror::Error;

use super::validate::{validate, ValidationError};
use crate::models::{Band, CreateBand};
use crate::store::{BandStore, StoreError};

/// Why a band could not be created: the payload was bad, or the store
/// failed. Handlers map the former to a client error and the latter to a
/// server error.
#[derive(Error, Debug)]
pub enum CreateBandError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Band business logic over an explicitly injected store.
#[derive(Clone)]
pub struct BandService {
    store: Arc<dyn BandStore>,
}

impl BandService {
    pub fn new(store: Arc<dyn BandStore>) -> Self {
        BandService { store }
    }

    /// Validates the payload, then persists it. No record is created when
    /// any field fails validation.
    pub async fn create(&self, band: CreateBand) -> Result<Band, CreateBandError> {
        validate(&band)?;
        Ok(self.store.create(&band).await?)
    }

    pub async fn list(&self) -> Result<Vec<Band>, StoreError> {
        self.store.list().await
    }

    /// Deletes by id, returning the number of removed records. Deleting an
    /// absent id is not an error and reports zero.
    pub async fn delete(&self, id: &str) -> Result<u64, StoreError> {
        self.store.delete(id).await
    }
}

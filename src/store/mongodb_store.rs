use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::{Band, CreateBand};
use crate::store::{BandStore, StoreError};

/// The config struct for MongoDB connections.
///
/// When `database` is omitted, the database encoded in the URI is used,
/// falling back to "bands".
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone)]
pub struct MongoDBConfig {
    pub uri: String,
    pub database: Option<String>,
}

const DEFAULT_DATABASE: &str = "bands";

/// A concrete `BandStore` implementation backed by a MongoDB collection.
pub struct MongoDBStore {
    collection: Collection<BandDocument>,
}

/// Document shape for band records in MongoDB.
#[derive(Serialize, Deserialize, Clone, Debug)]
struct BandDocument {
    _id: ObjectId,
    name: String,
    members: Vec<String>,
    albums: i64,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    updated_at: DateTime<Utc>,
}

impl MongoDBStore {
    /// Creates a new `MongoDBStore` from the given config.
    pub async fn new(config: &MongoDBConfig) -> Result<Self, StoreError> {
        info!("Connecting to MongoDB at URI: {}", config.uri);

        let mut client_options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|e| StoreError::Unavailable(format!("Failed to parse MongoDB URI: {}", e)))?;

        client_options.app_name = Some("Bands-API".to_string());

        let client = Client::with_options(client_options)
            .map_err(|e| StoreError::Unavailable(format!("Failed to create MongoDB client: {}", e)))?;

        // Explicit config wins, then the database embedded in the URI.
        let database = match &config.database {
            Some(name) => client.database(name),
            None => client
                .default_database()
                .unwrap_or_else(|| client.database(DEFAULT_DATABASE)),
        };

        info!(database = %database.name(), "MongoDB connection established successfully.");

        Ok(Self {
            collection: database.collection::<BandDocument>("bands"),
        })
    }

    /// Builds a fresh document for a validated creation payload.
    fn band_to_doc(band: &CreateBand) -> BandDocument {
        let now = Utc::now();
        BandDocument {
            _id: ObjectId::new(),
            name: band.name.clone(),
            members: band.members.clone(),
            albums: band.albums,
            created_at: now,
            updated_at: now,
        }
    }

    /// Converts a stored document back into the API record.
    fn doc_to_band(doc: &BandDocument) -> Band {
        Band {
            id: doc._id.to_hex(),
            name: doc.name.clone(),
            members: doc.members.clone(),
            albums: doc.albums,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

#[async_trait]
impl BandStore for MongoDBStore {
    async fn create(&self, band: &CreateBand) -> Result<Band, StoreError> {
        let doc = Self::band_to_doc(band);
        self.collection
            .insert_one(doc.clone(), None)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to insert band: {}", e)))?;
        Ok(Self::doc_to_band(&doc))
    }

    async fn list(&self) -> Result<Vec<Band>, StoreError> {
        let mut cursor = self
            .collection
            .find(None, None)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to list bands: {}", e)))?;

        let mut bands = Vec::new();
        while let Some(doc) = cursor
            .try_next()
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to read band document: {}", e)))?
        {
            bands.push(Self::doc_to_band(&doc));
        }

        Ok(bands)
    }

    async fn delete(&self, id: &str) -> Result<u64, StoreError> {
        // An id that is not a valid ObjectId cannot match any document, so
        // the delete stays idempotent instead of failing.
        let oid = match ObjectId::parse_str(id) {
            Ok(oid) => oid,
            Err(_) => {
                debug!(id = %id, "Delete requested for unparseable id; nothing to remove.");
                return Ok(0);
            }
        };

        let result = self
            .collection
            .delete_one(doc! { "_id": oid }, None)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to delete band: {}", e)))?;

        Ok(result.deleted_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queen() -> CreateBand {
        CreateBand {
            name: "Queen".to_string(),
            members: vec!["Freddie".to_string(), "Brian".to_string()],
            albums: 15,
        }
    }

    /// Converting a payload to a document and back preserves the fields and
    /// assigns a well-formed id.
    #[test]
    fn test_band_doc_conversion() {
        let doc = MongoDBStore::band_to_doc(&queen());
        let band = MongoDBStore::doc_to_band(&doc);

        assert_eq!(band.id, doc._id.to_hex());
        assert_eq!(band.name, "Queen");
        assert_eq!(band.members, vec!["Freddie", "Brian"]);
        assert_eq!(band.albums, 15);
        assert_eq!(band.created_at, band.updated_at);
    }

    /// Two documents built from the same payload get distinct ids.
    #[test]
    fn test_fresh_ids_per_document() {
        let a = MongoDBStore::band_to_doc(&queen());
        let b = MongoDBStore::band_to_doc(&queen());
        assert_ne!(a._id, b._id);
    }
}

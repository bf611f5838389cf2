use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::store::mongodb_store::MongoDBConfig;

/// A wrapper for the store configuration. A missing backend is allowed at
/// parse time (the file may rely on the DATABASE_URI environment variable)
/// but is fatal once the store is constructed.
#[derive(Deserialize, Serialize, Debug, Default, JsonSchema)]
pub struct StoreConfig {
    #[serde(flatten)]
    pub backend: Option<StoreBackend>,
}

/// The available store backends, differentiated via a "type" tag in the
/// YAML.
#[derive(Deserialize, Serialize, Debug, JsonSchema)]
#[serde(tag = "type")]
pub enum StoreBackend {
    #[serde(rename = "mongodb")]
    MongoDB(MongoDBConfig),
    /// Volatile storage for local runs and the offline test suite.
    #[serde(rename = "memory")]
    Memory,
}

use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use super::store::{StoreBackend, StoreConfig};
use crate::store::mongodb_store::MongoDBConfig;

/// Top-level service configuration.
#[derive(Deserialize, Serialize, Debug, JsonSchema)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_bind_address() -> String {
    "0.0.0.0:3000".to_string()
}

/// Load config from "config.yaml" in the current directory, merged with
/// BANDS_API_* environment variables (double underscore nests, e.g.
/// BANDS_API_LOGGING__LEVEL=debug). The DATABASE_URI variable supplies or
/// overrides the MongoDB connection string.
pub fn load_config() -> Config {
    let figment = Figment::new()
        .merge(Yaml::file("./config.yaml"))
        .merge(Env::prefixed("BANDS_API_").split("__"));

    let mut config = match figment.extract::<Config>() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Ok(uri) = std::env::var("DATABASE_URI") {
        config.store.backend = Some(match config.store.backend.take() {
            // Keep a configured database name, swap the URI.
            Some(StoreBackend::MongoDB(mongo)) => StoreBackend::MongoDB(MongoDBConfig {
                uri,
                database: mongo.database,
            }),
            _ => StoreBackend::MongoDB(MongoDBConfig {
                uri,
                database: None,
            }),
        });
    }

    config
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() {
    let schema = schema_for!(Config);
    println!(
        "{}",
        serde_json::to_string_pretty(&schema).expect("Failed to serialize config schema")
    );
}

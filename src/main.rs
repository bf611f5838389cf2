use std::sync::Arc;

use tracing::error;

use bandsapi::config::{load_config, print_schema};
use bandsapi::startup;
use bandsapi::utils::logger::init_logging;

#[tokio::main]
async fn main() {
    // `bandsapi --schema` dumps the config JSON schema and exits.
    if std::env::args().any(|arg| arg == "--schema") {
        print_schema();
        return;
    }

    let config = Arc::new(load_config());
    init_logging(&config.logging);

    if let Err(e) = startup::run(config).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

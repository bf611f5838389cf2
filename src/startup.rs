//! Application startup and server initialization.
//!
//! This module handles the creation and configuration of the HTTP server,
//! including initialization of the band store, metrics, and route setup.

use std::sync::Arc;
use std::time::Instant;

use tokio::net::TcpListener;
use tracing::info;

use crate::bands::BandService;
use crate::config::Config;
use crate::metrics::Metrics;
use crate::routes;
use crate::state::AppState;
use crate::store::create_store;

/// Initializes and runs the application server.
///
/// Sets up the band store, the metrics registry, and the HTTP server with
/// configured routes. Binds to the address specified in the configuration
/// and starts serving requests.
///
/// # Errors
///
/// Returns an error if the server fails to bind to the specified address
/// or encounters a runtime error during execution.
pub async fn run(config: Arc<Config>) -> Result<(), Box<dyn std::error::Error>> {
    let store = create_store(&config.store).await;
    let metrics = Metrics::new();

    info!("Starting server on {}", config.bind_address);

    let state = AppState {
        config: config.clone(),
        bands: BandService::new(store),
        metrics,
        started_at: Instant::now(),
    };

    let app = routes::create_router(state);

    let listener = TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

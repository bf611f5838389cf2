use std::sync::Arc;
use std::time::Instant;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, Response};
use axum::Router;
use figment::{
    providers::{Format, Yaml},
    Figment,
};
use serde_json::Value;

use bandsapi::bands::BandService;
use bandsapi::config::Config;
use bandsapi::metrics::Metrics;
use bandsapi::routes::create_router;
use bandsapi::state::AppState;
use bandsapi::store::create_store;

pub const TEST_CONFIG: &str = r#"
bind_address: "127.0.0.1:0"
logging:
  level: "debug"
  format: "console"
store:
  type: memory
"#;

/// Builds the full application router on the in-memory store, the same way
/// startup does.
pub async fn build_app() -> Router {
    let config: Config = Figment::new()
        .merge(Yaml::string(TEST_CONFIG))
        .extract()
        .expect("test config should parse");
    let config = Arc::new(config);
    let store = create_store(&config.store).await;

    let state = AppState {
        config,
        bands: BandService::new(store),
        metrics: Metrics::new(),
        started_at: Instant::now(),
    };

    create_router(state)
}

pub fn get_request(path: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .expect("failed to build request")
}

pub fn delete_request(path: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(path)
        .body(Body::empty())
        .expect("failed to build request")
}

pub fn post_json_request(path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(path)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

pub async fn response_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    String::from_utf8(bytes.to_vec()).expect("response body should be UTF-8")
}

pub async fn response_json(response: Response<Body>) -> Value {
    serde_json::from_str(&response_text(response).await).expect("response body should be JSON")
}

mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use common::{build_app, delete_request, get_request, post_json_request, response_text};

async fn scrape(app: &axum::Router) -> String {
    let response = app.clone().oneshot(get_request("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get("Content-Type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    response_text(response).await
}

#[tokio::test]
async fn test_concurrent_requests_counted_exactly() {
    let app = build_app().await;

    let (first, second) = tokio::join!(
        app.clone().oneshot(get_request("/bands")),
        app.clone().oneshot(get_request("/bands")),
    );
    assert_eq!(first.unwrap().status(), StatusCode::OK);
    assert_eq!(second.unwrap().status(), StatusCode::OK);

    let text = scrape(&app).await;
    assert!(text.contains(
        "http_requests_total{method=\"GET\",path=\"/bands\",status=\"200\"} 2\n"
    ));
}

#[tokio::test]
async fn test_durations_recorded_alongside_counts() {
    let app = build_app().await;

    let response = app.clone().oneshot(get_request("/bands")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let text = scrape(&app).await;
    assert!(text.contains("# TYPE http_request_duration_seconds histogram\n"));
    assert!(text.contains(
        "http_request_duration_seconds_bucket{method=\"GET\",path=\"/bands\",status=\"200\",le=\"+Inf\"} 1\n"
    ));
    assert!(text.contains(
        "http_request_duration_seconds_count{method=\"GET\",path=\"/bands\",status=\"200\"} 1\n"
    ));
    assert!(text
        .contains("http_request_duration_seconds_sum{method=\"GET\",path=\"/bands\",status=\"200\"}"));
}

#[tokio::test]
async fn test_path_label_uses_route_template() {
    let app = build_app().await;

    let response = app
        .clone()
        .oneshot(delete_request("/bands/653f1f77bcf86cd799439011"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let text = scrape(&app).await;
    assert!(text.contains(
        "http_requests_total{method=\"DELETE\",path=\"/bands/:id\",status=\"200\"} 1\n"
    ));
    assert!(!text.contains("653f1f77bcf86cd799439011"));
}

#[tokio::test]
async fn test_error_statuses_are_labeled() {
    let app = build_app().await;

    let response = app
        .clone()
        .oneshot(post_json_request(
            "/bands",
            json!({"name": "", "members": [], "albums": 0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let text = scrape(&app).await;
    assert!(text.contains(
        "http_requests_total{method=\"POST\",path=\"/bands\",status=\"422\"} 1\n"
    ));
}

#[tokio::test]
async fn test_metrics_endpoint_never_observes_itself() {
    let app = build_app().await;

    scrape(&app).await;
    scrape(&app).await;
    let text = scrape(&app).await;
    assert!(!text.contains("path=\"/metrics\""));
}

#[tokio::test]
async fn test_scrape_is_idempotent_without_traffic() {
    let app = build_app().await;

    let response = app.clone().oneshot(get_request("/bands")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The process-memory gauge is recollected per scrape, so compare only
    // the request series.
    let filter = |text: String| -> Vec<String> {
        text.lines()
            .filter(|line| line.starts_with("http_"))
            .map(str::to_string)
            .collect()
    };
    let first = filter(scrape(&app).await);
    let second = filter(scrape(&app).await);
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

/// Every series line parses back into (name, labels, value).
#[tokio::test]
async fn test_exposition_output_is_well_formed() {
    let app = build_app().await;

    let response = app.clone().oneshot(get_request("/bands")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let response = app
        .clone()
        .oneshot(post_json_request(
            "/bands",
            json!({"name": "Queen", "members": ["Freddie"], "albums": 15}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let text = scrape(&app).await;
    assert!(!text.is_empty());

    for line in text.lines() {
        if line.starts_with('#') {
            let is_header = line.starts_with("# HELP ") || line.starts_with("# TYPE ");
            assert!(is_header, "unexpected comment line: {}", line);
            continue;
        }

        let (series, value) = line.rsplit_once(' ').expect("series line has a value");
        assert!(value.parse::<f64>().is_ok(), "unparseable value: {}", line);

        let name = match series.split_once('{') {
            Some((name, rest)) => {
                let labels = rest.strip_suffix('}').expect("labels close with a brace");
                for pair in labels.split("\",") {
                    let (label_name, label_value) =
                        pair.split_once("=\"").expect("label pair is name=\"value\"");
                    assert!(!label_name.is_empty());
                    assert!(!label_value.contains('"') || label_value.ends_with('"'));
                }
                name
            }
            None => series,
        };
        assert!(
            name.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':'),
            "invalid metric name in line: {}",
            line
        );
    }
}

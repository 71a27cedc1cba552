//! End-to-end API tests driving the router in-process.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use capacity_server::{Config, ServerState, build_app};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::Service;

fn test_config() -> Config {
    Config {
        http_port: 0,
        environment: "test".to_string(),
        log_level: "info".to_string(),
        log_dir: None,
        google_ai_api_key: String::new(),
        gemini_model: "gemini-2.5-flash".to_string(),
        vision_timeout_ms: 5000,
        use_mock_analysis: false,
        mock_analysis_error: None,
    }
}

fn test_state(config: Config) -> ServerState {
    ServerState::initialize(&config)
}

async fn send(state: ServerState, request: Request<Body>) -> (StatusCode, Value) {
    let mut app = build_app().with_state(state);
    let response = app.call(request).await.expect("router call failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body read failed")
        .to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// ========== /api/calculate ==========

#[tokio::test]
async fn calculate_returns_worked_example() {
    let request = post_json(
        "/api/calculate",
        json!({
            "totalArea": 2000,
            "venueType": "standing",
            "entranceCount": 2,
            "aisleWidth": 2
        }),
    );
    let (status, body) = send(test_state(test_config()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["input"]["totalArea"], 2000.0);
    assert_eq!(body["input"]["venueType"], "standing");
    assert_eq!(body["calculation"]["spacePerPerson"], 0.5);
    assert_eq!(body["calculation"]["theoreticalMax"], 4000);
    assert_eq!(body["calculation"]["exitCapacity"], 550);
    assert_eq!(body["calculation"]["bottleneckRisk"], true);
    assert_eq!(body["capacities"]["level2"], 1700);
    assert_eq!(body["result"]["recommended"], 467);
    assert_eq!(body["result"]["maximum"], 467);
    assert!(body["result"]["safetyNote"].is_string());
}

#[tokio::test]
async fn calculate_applies_defaults() {
    let request = post_json(
        "/api/calculate",
        json!({ "totalArea": 500, "venueType": "banquet" }),
    );
    let (status, body) = send(test_state(test_config()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["input"]["entranceCount"], 2);
    assert_eq!(body["input"]["aisleWidth"], 2.0);
}

#[tokio::test]
async fn calculate_rejects_missing_or_non_positive_area() {
    for body in [
        json!({ "venueType": "standing" }),
        json!({ "totalArea": 0, "venueType": "standing" }),
        json!({ "totalArea": -50, "venueType": "standing" }),
    ] {
        let (status, body) = send(test_state(test_config()), post_json("/api/calculate", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn calculate_rejects_unknown_venue_type() {
    let request = post_json(
        "/api/calculate",
        json!({ "totalArea": 100, "venueType": "stadium" }),
    );
    let (status, body) = send(test_state(test_config()), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("stadium"));
}

// ========== /api/analyze ==========

fn tiny_png() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(2, 2, image::Rgb([240, 240, 240]));
    let mut buffer = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Png).unwrap();
    buffer.into_inner()
}

const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

fn multipart_request(uri: &str, fields: &[(&str, Option<&str>, Vec<u8>)]) -> Request<Body> {
    let mut body = Vec::new();
    for (name, filename, data) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match filename {
            Some(fname) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{fname}\"\r\n\
                         Content-Type: image/png\r\n\r\n"
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
            }
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn analyze_mock_mode_returns_sample_analysis() {
    let mut config = test_config();
    config.use_mock_analysis = true;

    let request = multipart_request(
        "/api/analyze",
        &[
            ("image", Some("plan.png"), tiny_png()),
            ("boothSize", None, b"9".to_vec()),
        ],
    );
    let (status, body) = send(test_state(config), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isFloorPlan"], true);
    assert_eq!(body["boothCount"], 24);
    assert_eq!(body["entranceCount"], 3);
    assert_eq!(body["boothSize"], 9.0);
    assert_eq!(body["estimatedBoothArea"], 216.0);
    assert_eq!(body["estimatedTotalArea"], 2000.0);
    assert_eq!(body["zones"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn analyze_requires_an_image_field() {
    let mut config = test_config();
    config.use_mock_analysis = true;

    let request = multipart_request("/api/analyze", &[("boothSize", None, b"9".to_vec())]);
    let (status, body) = send(test_state(config), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("image"));
}

#[tokio::test]
async fn analyze_rejects_undecodable_image() {
    let mut config = test_config();
    config.use_mock_analysis = true;

    let request = multipart_request(
        "/api/analyze",
        &[("image", Some("plan.png"), b"not an image".to_vec())],
    );
    let (status, body) = send(test_state(config), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("invalid image"));
}

#[tokio::test]
async fn analyze_quota_mock_surfaces_upstream_error() {
    let mut config = test_config();
    config.mock_analysis_error = Some("quota".to_string());

    let request = multipart_request("/api/analyze", &[("image", Some("plan.png"), tiny_png())]);
    let (status, body) = send(test_state(config), request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("quota"));
}

// ========== /api/monitor ==========

#[tokio::test]
async fn monitor_session_lifecycle() {
    let state = test_state(test_config());

    // Start
    let request = post_json(
        "/api/monitor/sessions",
        json!({
            "capacities": { "level1": 100, "level2": 200, "level3": 300, "level4": 400, "level5": 500 },
            "interval": "1min"
        }),
    );
    let (status, body) = send(state.clone(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["running"], true);
    assert_eq!(body["currentCount"], 250);
    let session_id = body["sessionId"].as_str().unwrap().to_string();

    // Snapshot
    let request = Request::builder()
        .uri(format!("/api/monitor/sessions/{session_id}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(state.clone(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["capacities"]["level5"], 500);
    assert!(body["currentLevel"].as_u64().unwrap() >= 1);

    // Stop: the session stays queryable with its last readings
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/monitor/sessions/{session_id}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(state.clone(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stopped"], true);

    let request = Request::builder()
        .uri(format!("/api/monitor/sessions/{session_id}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(state.clone(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["running"], false);

    // A second stop removes it
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/monitor/sessions/{session_id}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(state.clone(), request).await;
    assert_eq!(status, StatusCode::OK);

    let request = Request::builder()
        .uri(format!("/api/monitor/sessions/{session_id}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(state, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn monitor_accepts_extreme_capacity_levels() {
    let max = u64::MAX;
    let request = post_json(
        "/api/monitor/sessions",
        json!({
            "capacities": {
                "level1": max, "level2": max, "level3": max, "level4": max, "level5": max
            }
        }),
    );
    let (status, body) = send(test_state(test_config()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["currentCount"], max);
}

#[tokio::test]
async fn monitor_rejects_zero_capacities() {
    let request = post_json(
        "/api/monitor/sessions",
        json!({
            "capacities": { "level1": 0, "level2": 0, "level3": 0, "level4": 0, "level5": 0 }
        }),
    );
    let (status, body) = send(test_state(test_config()), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn unknown_monitor_session_is_404() {
    let request = Request::builder()
        .uri(format!("/api/monitor/sessions/{}", uuid::Uuid::new_v4()))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(test_state(test_config()), request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

// ========== /health ==========

#[tokio::test]
async fn health_reports_version() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(test_state(test_config()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn health_uptime_counts_from_server_start() {
    let mut state = test_state(test_config());
    // Backdate the start instant; the first request must already see it
    state.started_at = std::time::SystemTime::now() - std::time::Duration::from_secs(120);

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(state, request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["uptime_seconds"].as_u64().unwrap() >= 120);
}

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use common::wait_for_server;
use cyberqr::report::{
    build_router, JsonlReportStore, MemoryReportStore, ReportServer, ReportType,
};

fn report_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/report")
        .header("content-type", "application/json")
        .header("x-forwarded-for", "198.51.100.7, 10.0.0.1")
        .header("user-agent", "cyberqr-test/1.0")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn report_is_normalized_and_persisted() {
    let store = Arc::new(MemoryReportStore::new());
    let app = build_router(store.clone());

    let response = app
        .oneshot(report_request(
            r#"{"url": "HTTP://Evil.com ", "reportType": "malicious"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, serde_json::json!({ "success": true }));

    let documents = store.documents();
    assert_eq!(documents.len(), 1);
    let document = &documents[0];
    assert_eq!(document.url, "http://evil.com");
    assert_eq!(document.report_type, ReportType::Malicious);
    assert_eq!(document.user_reason, None);
    assert_eq!(document.ip, "198.51.100.7");
    assert_eq!(document.user_agent, "cyberqr-test/1.0");
}

#[tokio::test]
async fn missing_report_type_is_bad_request() {
    let store = Arc::new(MemoryReportStore::new());
    let app = build_router(store.clone());

    let response = app
        .oneshot(report_request(r#"{"url": "http://evil.com"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["type"], "invalid_request");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("reportType"));
    assert!(store.documents().is_empty());
}

#[tokio::test]
async fn missing_url_is_bad_request() {
    let app = build_router(Arc::new(MemoryReportStore::new()));
    let response = app
        .oneshot(report_request(r#"{"url": "   ", "reportType": "safe"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_report_type_is_bad_request() {
    let app = build_router(Arc::new(MemoryReportStore::new()));
    let response = app
        .oneshot(report_request(
            r#"{"url": "http://a.example", "reportType": "suspicious"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = build_router(Arc::new(MemoryReportStore::new()));
    let response = app.oneshot(report_request("{not json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn persistence_failure_hides_details() {
    let store = Arc::new(MemoryReportStore::new());
    store.set_failing(true);
    let app = build_router(store.clone());

    let response = app
        .oneshot(report_request(
            r#"{"url": "http://a.example", "reportType": "false_positive", "userReason": "my bank"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"]["message"], "Failed to submit report");
    assert!(body["error"]["request_id"].is_string());
}

#[tokio::test]
async fn health_reports_service_name() {
    let app = build_router(Arc::new(MemoryReportStore::new()));
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "cyberqr");
}

#[tokio::test]
async fn server_persists_to_jsonl_and_shuts_down() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("reports.jsonl");

    let mut server = ReportServer::new(Arc::new(JsonlReportStore::new(&path)));
    let addr = server.bind("127.0.0.1:0").await.unwrap();
    let handle = server.handle();
    let task = tokio::spawn(server.run());
    assert!(wait_for_server(addr, Duration::from_secs(2)).await);

    let body = r#"{"url":"HTTP://Evil.com ","reportType":"malicious","userReason":"phishing"}"#;
    let request = format!(
        "POST /api/report HTTP/1.1\r\nHost: {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        addr,
        body.len(),
        body
    );
    let response = raw_http(addr, &request).await;
    assert!(response.starts_with("HTTP/1.1 200"), "got: {}", response);
    assert!(response.contains(r#"{"success":true}"#));

    handle.shutdown();
    tokio::time::timeout(Duration::from_secs(2), task)
        .await
        .expect("server should stop")
        .unwrap()
        .unwrap();

    let documents = JsonlReportStore::new(&path).load_all().unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].url, "http://evil.com");
    assert_eq!(documents[0].user_reason.as_deref(), Some("phishing"));
    assert_eq!(documents[0].ip, "unknown");
}

async fn raw_http(addr: std::net::SocketAddr, request: &str) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

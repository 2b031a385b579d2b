use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;

use super::*;

#[derive(Clone, Default)]
struct Captured {
    requests: Arc<Mutex<Vec<(Option<String>, serde_json::Value)>>>,
}

async fn accept(State(captured): State<Captured>, headers: HeaderMap, body: String) -> (StatusCode, &'static str) {
    let content_type = headers.get("content-type").and_then(|v| v.to_str().ok()).map(str::to_string);
    let json = serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
    captured.requests.lock().unwrap().push((content_type, json));
    (StatusCode::CREATED, "ok")
}

async fn reject() -> (StatusCode, &'static str) {
    (StatusCode::UNPROCESSABLE_ENTITY, "nope")
}

async fn spawn_server(captured: Captured) -> String {
    let app = Router::new()
        .route("/feedback/proj", post(accept))
        .route("/reject", post(reject))
        .with_state(captured);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn body() -> FeedbackBody {
    FeedbackBody {
        url: Some("https://app.example/page".into()),
        name: None,
        email: Some("user@example.com".into()),
        message: "Love it".into(),
        metadata: None,
    }
}

// =============================================================
// wire shape
// =============================================================

#[test]
fn body_omits_absent_fields() {
    let json = serde_json::to_value(body()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "url": "https://app.example/page", "email": "user@example.com", "message": "Love it" })
    );
}

#[test]
fn only_2xx_is_success() {
    let response = |status| FeedbackResponse { status, body: String::new() };
    assert!(response(200).is_success());
    assert!(response(204).is_success());
    assert!(!response(199).is_success());
    assert!(!response(302).is_success());
    assert!(!response(500).is_success());
}

#[test]
fn timeouts_default() {
    let timeouts = TransportTimeouts::default();
    assert_eq!(timeouts.request_secs, 30);
    assert_eq!(timeouts.connect_secs, 10);
}

// =============================================================
// HttpTransport against a live server
// =============================================================

#[tokio::test]
async fn posts_json_with_content_type() {
    let captured = Captured::default();
    let base = spawn_server(captured.clone()).await;
    let transport = HttpTransport::new(TransportTimeouts::default()).unwrap();

    let response = transport.post_json(&format!("{base}/feedback/proj"), &body()).await.unwrap();
    assert_eq!(response.status, 201);
    assert_eq!(response.body, "ok");
    assert!(response.is_success());

    let requests = captured.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0.as_deref(), Some("application/json"));
    assert_eq!(requests[0].1["message"], "Love it");
    assert!(requests[0].1.get("name").is_none());
}

#[tokio::test]
async fn non_success_status_is_returned_not_raised() {
    let base = spawn_server(Captured::default()).await;
    let transport = HttpTransport::new(TransportTimeouts::default()).unwrap();

    let response = transport.post_json(&format!("{base}/reject"), &body()).await.unwrap();
    assert_eq!(response.status, 422);
    assert!(!response.is_success());
}

#[tokio::test]
async fn connection_failure_is_request_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let transport = HttpTransport::new(TransportTimeouts { request_secs: 5, connect_secs: 2 }).unwrap();
    let err = transport.post_json(&format!("http://{addr}/x"), &body()).await.unwrap_err();
    assert!(matches!(err, SubmitError::Request(_)));
}

#[tokio::test]
async fn unreadable_failure_body_keeps_status() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        while !String::from_utf8_lossy(&request).contains("Love it") {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
        }
        // Promise more body than is sent, then hang up.
        socket
            .write_all(b"HTTP/1.1 503 Service Unavailable\r\ncontent-length: 64\r\n\r\npartial")
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });

    let transport = HttpTransport::new(TransportTimeouts { request_secs: 5, connect_secs: 2 }).unwrap();
    let response = transport.post_json(&format!("http://{addr}/x"), &body()).await.unwrap();
    assert_eq!(response.status, 503);
    assert_eq!(response.body, "");
}

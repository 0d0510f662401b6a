//! Integration tests for the Gemini client against a local one-shot HTTP server.

use super::test_utils::serve_once;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use cardgen::batch::{BatchDriver, RecordOutcome};
use cardgen::config::{Credentials, ProviderConfig};
use cardgen::error::RecordFailure;
use cardgen::manifest::FlashcardRecord;
use cardgen::pacing::FixedPacer;
use cardgen::provider::{GeminiImageClient, ImageProviderClient};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn client_for(endpoint: String) -> GeminiImageClient {
    let config = ProviderConfig {
        endpoint,
        ..ProviderConfig::default()
    };
    GeminiImageClient::new(&config, Credentials::new("test-key")).unwrap()
}

fn image_body(bytes: &[u8]) -> String {
    json!({
        "candidates": [{
            "content": {"parts": [
                {"text": "Here you go"},
                {"inlineData": {"mimeType": "image/png", "data": BASE64.encode(bytes)}}
            ]},
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

#[tokio::test]
async fn test_request_shape_and_image_extraction() {
    let (endpoint, server) = serve_once("200 OK", image_body(b"png-bytes")).await;
    let client = client_for(endpoint);

    let image = client.request_image("a red apple").await.unwrap();
    assert_eq!(image.data, b"png-bytes");
    assert_eq!(image.mime_type.as_deref(), Some("image/png"));

    let request = server.await.unwrap();
    let lower = request.to_ascii_lowercase();
    assert!(request.starts_with(
        "POST /v1beta/models/gemini-2.5-flash-image:generateContent"
    ));
    assert!(lower.contains("x-goog-api-key: test-key"));
    assert!(request.contains("\"responseModalities\":[\"IMAGE\"]"));
    assert!(request.contains("a red apple"));
}

#[tokio::test]
async fn test_rate_limit_status_is_request_failed() {
    let body = json!({"error": {"code": 429, "message": "Resource exhausted"}}).to_string();
    let (endpoint, server) = serve_once("429 Too Many Requests", body).await;
    let client = client_for(endpoint);

    match client.request_image("a red apple").await {
        Err(RecordFailure::RequestFailed(msg)) => {
            assert!(msg.starts_with("Rate limit exceeded"), "{}", msg);
            assert!(msg.contains("Resource exhausted"));
        }
        other => panic!("expected RequestFailed, got {:?}", other),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn test_text_only_response_is_no_image() {
    let body = json!({
        "candidates": [{"content": {"parts": [{"text": "I can't draw that"}]}}]
    })
    .to_string();
    let (endpoint, server) = serve_once("200 OK", body).await;

    assert_eq!(
        client_for(endpoint).request_image("x").await.unwrap_err(),
        RecordFailure::NoImageReturned
    );
    server.await.unwrap();
}

#[tokio::test]
async fn test_malformed_body_is_request_failed() {
    let (endpoint, server) = serve_once("200 OK", "<html>oops</html>".to_string()).await;

    assert!(matches!(
        client_for(endpoint).request_image("x").await,
        Err(RecordFailure::RequestFailed(_))
    ));
    server.await.unwrap();
}

#[tokio::test]
async fn test_driver_writes_service_bytes_to_disk() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("public");
    let (endpoint, server) = serve_once("200 OK", image_body(b"\x89PNG-real")).await;

    let driver = BatchDriver::new(
        output.clone(),
        Arc::new(client_for(endpoint)),
        Arc::new(FixedPacer::new(Duration::ZERO, Duration::ZERO)),
    );
    let summary = driver
        .run(&[FlashcardRecord::new("a red apple", "/img/apple.png")])
        .await;
    server.await.unwrap();

    assert_eq!(
        summary.reports[0].outcome,
        RecordOutcome::Generated(output.join("img/apple.png"))
    );
    assert_eq!(
        std::fs::read(output.join("img/apple.png")).unwrap(),
        b"\x89PNG-real"
    );
}

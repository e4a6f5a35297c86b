//! Handler tests for the OCR domain
//!
//! Multipart bodies are assembled by hand so each test controls the field
//! name, filename and payload exactly.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use core_upstream::{RetryConfig, UpstreamError, UpstreamResult};
use domain_ocr::*;
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::ServiceExt; // For oneshot()

const BOUNDARY: &str = "wine-label-boundary";
const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01";

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// One multipart part; `filename: None` sends a plain form value.
fn multipart(field: &str, filename: Option<&str>, data: &[u8]) -> Request<Body> {
    let disposition = match filename {
        Some(name) => format!("form-data; name=\"{}\"; filename=\"{}\"", field, name),
        None => format!("form-data; name=\"{}\"", field),
    };

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(format!("Content-Disposition: {}\r\n", disposition).as_bytes());
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/ocr")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

struct StubDetector {
    reply: UpstreamResult<String>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl TextDetector for StubDetector {
    async fn detect_text(&self, _image: &[u8]) -> UpstreamResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone()
    }
}

fn app(reply: UpstreamResult<String>) -> (axum::Router, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let detector = StubDetector {
        reply,
        calls: calls.clone(),
    };
    let service = OcrService::new(detector).with_retry(RetryConfig::new().with_max_retries(0));
    (handlers::router(service), calls)
}

#[tokio::test]
async fn test_extracts_text_from_image() {
    let (app, calls) = app(Ok("BAROLO\n2016".to_string()));

    let response = app
        .oneshot(multipart("image", Some("label.png"), PNG))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: ExtractedText = json_body(response.into_body()).await;
    assert_eq!(body.text, "BAROLO\n2016");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_image_without_text_returns_empty_string() {
    let (app, _) = app(Ok(String::new()));

    let response = app
        .oneshot(multipart("image", Some("blank.png"), PNG))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body, serde_json::json!({"text": ""}));
}

#[tokio::test]
async fn test_missing_image_field_is_400() {
    let (app, calls) = app(Ok(String::new()));

    let response = app
        .oneshot(multipart("photo", Some("label.png"), PNG))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "No image file provided");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_plain_form_value_is_not_a_file() {
    let (app, _) = app(Ok(String::new()));

    let response = app.oneshot(multipart("image", None, PNG)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "No image file provided");
}

#[tokio::test]
async fn test_empty_filename_is_400() {
    let (app, _) = app(Ok(String::new()));

    let response = app.oneshot(multipart("image", Some(""), PNG)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "No image file selected");
}

#[tokio::test]
async fn test_empty_and_unrecognised_images_are_400() {
    for data in [&b""[..], &b"just some text"[..]] {
        let (app, calls) = app(Ok(String::new()));

        let response = app
            .oneshot(multipart("image", Some("label.png"), data))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = json_body(response.into_body()).await;
        assert_eq!(body["code"], "UNSUPPORTED_MEDIA");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}

#[tokio::test]
async fn test_upstream_failure_is_502() {
    let (app, _) = app(Err(UpstreamError::Timeout { service: "vision" }));

    let response = app
        .oneshot(multipart("image", Some("label.png"), PNG))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["code"], "UPSTREAM_BAD_RESPONSE");
}

#[tokio::test]
async fn test_non_multipart_request_is_rejected_as_json() {
    let (app, _) = app(Ok(String::new()));

    let request = Request::builder()
        .method("POST")
        .uri("/ocr")
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(response.status().is_client_error());
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["code"], "MULTIPART_ERROR");
}

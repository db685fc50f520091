mod common;

use std::sync::Arc;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;
use tower::ServiceExt;
use bvr_annotate::server::{create_router, AppState};
use common::{annotator, grey_image, png_bytes, StubDetector};

const BOUNDARY: &str = "bvr-test-boundary";

fn app(model: StubDetector) -> Router {
    let state = AppState::new(Arc::new(model), Arc::new(annotator()));
    create_router(state, 16 * 1024 * 1024)
}

fn multipart_body(field: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"page.png\"\r\n").as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload(uri: &str, field: &str, data: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(multipart_body(field, data)))
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn index_shows_upload_form() {
    let response = app(StubDetector::empty())
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("YOLO Text and Figure Detection"));
    assert!(html.contains("name=\"image\""));
    assert!(html.contains("enctype=\"multipart/form-data\""));
}

#[tokio::test]
async fn health_check() {
    let response = app(StubDetector::empty())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn api_returns_image_and_details() {
    let png = png_bytes(&grey_image());
    let response = app(StubDetector::single_text_box())
        .oneshot(upload("/api/detect", "image", &png))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(
        json["details"],
        "Number of detections: 1\nDetection: text, Confidence: 0.75, Coordinates: [10.0, 10.0, 50.0, 50.0]"
    );

    let encoded = json["image"].as_str().unwrap();
    let decoded = image::load_from_memory(&STANDARD.decode(encoded).unwrap()).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (100, 80));
}

#[tokio::test]
async fn api_reports_failures_in_body() {
    let png = png_bytes(&grey_image());
    let response = app(StubDetector::failing("weights not loaded"))
        .oneshot(upload("/api/detect", "image", &png))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert!(json["image"].is_null());
    assert_eq!(json["details"], "Error during detection: weights not loaded");
}

#[tokio::test]
async fn api_without_image_field() {
    let response = app(StubDetector::single_text_box())
        .oneshot(upload("/api/detect", "document", b"whatever"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert!(json["image"].is_null());
    assert!(json["details"].as_str().unwrap().starts_with("Error during detection: "));
}

#[tokio::test]
async fn form_page_shows_details() {
    let png = png_bytes(&grey_image());
    let response = app(StubDetector::single_text_box())
        .oneshot(upload("/detect", "image", &png))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Detection Details"));
    assert!(html.contains("data:image/png;base64,"));
    assert!(html.contains("Detection: text, Confidence: 0.75"));
}

#[tokio::test]
async fn form_page_escapes_errors() {
    let response = app(StubDetector::failing("<script>bad</script>"))
        .oneshot(upload("/detect", "image", &png_bytes(&grey_image())))
        .await
        .unwrap();

    let html = body_string(response).await;
    assert!(!html.contains("data:image/png;base64,"));
    assert!(html.contains("Error during detection: &lt;script&gt;bad&lt;/script&gt;"));
}

#[tokio::test]
async fn non_multipart_request_is_rejected() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/detect")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("not a form"))
        .unwrap();
    let response = app(StubDetector::empty()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let state = AppState::new(Arc::new(StubDetector::single_text_box()), Arc::new(annotator()));
    let app = create_router(state, 1024);

    let response = app.oneshot(upload("/api/detect", "image", &vec![0u8; 64 * 1024])).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

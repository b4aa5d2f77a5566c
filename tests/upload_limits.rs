//! Upload edge cases exercised with raw requests through `tower::ServiceExt`.

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use common::{pdf_bytes, TestApp};

const BOUNDARY: &str = "pdf-share-test-boundary";

fn multipart_request(field: &str, file_name: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::with_capacity(data.len() + 256);
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_body_over_request_limit_reports_size_error() {
    let app = TestApp::with_config(|config| {
        config.storage.max_upload_size = 1024;
    })
    .await;

    // Far past the file limit plus multipart allowance
    let data = pdf_bytes(3 * 1024 * 1024);
    let response = app
        .router
        .clone()
        .oneshot(multipart_request("pdf", "huge.pdf", "application/pdf", &data))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"],
        "File too large. Maximum size is 1024 bytes"
    );
    assert!(app.stored_files().is_empty());
    assert!(app.partial_files().is_empty());
}

#[tokio::test]
async fn test_content_type_parameters_accepted() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(multipart_request(
            "pdf",
            "a.pdf",
            "application/pdf; charset=binary",
            &pdf_bytes(10),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["size"], 10);
}

#[tokio::test]
async fn test_empty_filename_counts_as_no_file() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(multipart_request("pdf", "", "application/pdf", &pdf_bytes(10)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "No file uploaded");
    assert!(app.stored_files().is_empty());
    assert!(app.partial_files().is_empty());
}

#[tokio::test]
async fn test_traversal_filename_stays_in_upload_dir() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(multipart_request(
            "pdf",
            "../../outside.pdf",
            "application/pdf",
            &pdf_bytes(10),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let id = body["fileId"].as_str().unwrap();

    assert_eq!(app.stored_files(), vec![format!("{id}.pdf")]);
    assert!(!app.upload_dir.path().parent().unwrap().join("outside.pdf").exists());
}

#[tokio::test]
async fn test_malformed_multipart_is_client_error() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from("this is not multipart"))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();

    assert!(response.status().is_client_error());
    assert!(app.stored_files().is_empty());
}

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use cliprelay::common::RelayConfig;
use cliprelay::server::{self, routes};
use cliprelay::store::SessionUploadStore;
use http_body_util::BodyExt;
use tempfile::TempDir;

pub const BOUNDARY: &str = "cliprelay-test-boundary";

pub fn setup_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

pub fn test_config(dir: &TempDir) -> RelayConfig {
    RelayConfig {
        upload_root: dir.path().join("uploads"),
        public_dir: None,
        ..RelayConfig::default()
    }
}

pub async fn open_store(dir: &TempDir) -> SessionUploadStore {
    SessionUploadStore::open(dir.path().join("uploads"), ".webm")
        .await
        .expect("Failed to open store")
}

pub async fn test_app(config: RelayConfig) -> Router {
    let state = server::build_state(config).await.expect("Failed to build state");
    routes::create_router(&state)
}

/// Single-field multipart body. `filename: None` sends a plain text field.
pub fn multipart_body(field: &str, filename: Option<&str>, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    match filename {
        Some(filename) => body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                field, filename
            )
            .as_bytes(),
        ),
        None => body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", field).as_bytes(),
        ),
    }
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn upload_request(session_id: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/upload/{}", session_id))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::HOST, "example.com")
        .body(Body::empty())
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("Body is not json")
}

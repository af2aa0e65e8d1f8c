use super::*;
use crate::importer::test_helpers::{FakeStepSource, create_test_importer, import_request};
use crate::types::UserId;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use std::time::Duration;
use tower::ServiceExt;


/// Router over a fresh importer, plus the owner id and the tempdir to keep alive
async fn test_router(steps: Arc<FakeStepSource>) -> (Router, Arc<RecipeImporter>, UserId, tempfile::TempDir) {
    let (importer, owner, temp_dir) = create_test_importer(steps).await;
    let importer = Arc::new(importer);
    let config = Arc::new(importer.config().clone());
    (create_router(importer.clone(), config), importer, owner, temp_dir)
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_api_server_stops_on_shutdown_signal() {
    let (importer, _owner, _temp_dir) =
        create_test_importer(Arc::new(FakeStepSource::default())).await;

    let mut config = importer.config().clone();
    config.api.bind_address = "127.0.0.1:0".parse().unwrap(); // Port 0 = OS assigns a free port
    let config = Arc::new(config);

    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(serve_until(Arc::new(importer), config, async move {
        stop_rx.await.ok();
    }));

    tokio::time::sleep(Duration::from_millis(100)).await;
    stop_tx.send(()).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(result.is_ok(), "server failed: {result:?}");
}

#[tokio::test]
async fn test_cors_enabled() {
    let (importer, _owner, _temp_dir) =
        create_test_importer(Arc::new(FakeStepSource::default())).await;

    let mut config = importer.config().clone();
    config.api.cors_enabled = true;
    config.api.cors_origins = vec!["*".to_string()];
    let app = create_router(Arc::new(importer), Arc::new(config));

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn test_cors_specific_origins() {
    let (importer, _owner, _temp_dir) =
        create_test_importer(Arc::new(FakeStepSource::default())).await;

    let mut config = importer.config().clone();
    config.api.cors_enabled = true;
    config.api.cors_origins = vec!["http://app.example.com".to_string()];
    let app = create_router(Arc::new(importer), Arc::new(config));

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://app.example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://app.example.com")
    );

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://evil.example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert!(
        response
            .headers()
            .get("access-control-allow-origin")
            .is_none()
    );
}

#[tokio::test]
async fn test_cors_disabled() {
    let (importer, _owner, _temp_dir) =
        create_test_importer(Arc::new(FakeStepSource::default())).await;

    let mut config = importer.config().clone();
    config.api.cors_enabled = false;
    let app = create_router(Arc::new(importer), Arc::new(config));

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(
        response
            .headers()
            .get("access-control-allow-origin")
            .is_none()
    );
}

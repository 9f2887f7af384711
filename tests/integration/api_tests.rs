//! HTTP API tests over a coordinator wired to the mock aggregator page

use crate::common::{config_for, mount_page, mount_status};
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use domain_scout::crawler::Coordinator;
use domain_scout::server::router;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::MockServer;

async fn get_domains(app: axum::Router) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/domains")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_api_scrapes_once_then_serves_cache() {
    let server = MockServer::start().await;
    mount_page(&server, 1).await;

    let coordinator = Arc::new(
        Coordinator::from_config(&config_for(&server, "backend = \"memory\"")).unwrap(),
    );
    let app = router(coordinator);

    let (status, first) = get_domains(app.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["url"], "https://zlib-official.example");
    assert_eq!(first["status"], "active");
    assert_eq!(first["source"], "crawler");
    assert_eq!(first["note"], "官方地址");

    let (_, second) = get_domains(app).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_api_returns_null_when_source_down_and_nothing_cached() {
    let server = MockServer::start().await;
    mount_status(&server, 503).await;

    let coordinator = Arc::new(
        Coordinator::from_config(&config_for(&server, "backend = \"memory\"")).unwrap(),
    );

    let (status, body) = get_domains(router(coordinator)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());
}

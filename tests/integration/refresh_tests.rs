//! End-to-end refresh tests against the mock aggregator page

use crate::common::{config_for, mount_page, mount_status, toml_path};
use chrono::Utc;
use domain_scout::crawler::{Coordinator, Scheduler};
use domain_scout::record::{AccessPointRecord, DomainSnapshot, RecordStatus};
use domain_scout::storage::{SqliteStore, Store, StoredEntry};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

fn stored_snapshot(url: &str) -> String {
    DomainSnapshot::new(
        vec![AccessPointRecord::crawled(url, "官方地址", Utc::now())],
        Utc::now(),
    )
    .to_json()
    .unwrap()
}

#[tokio::test]
async fn test_scrape_populates_sqlite_and_survives_restart() {
    let server = MockServer::start().await;
    mount_page(&server, 1).await;

    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("domains.db");
    let config = config_for(
        &server,
        &format!("backend = \"sqlite\"\npath = \"{}\"", toml_path(&db)),
    );

    let coordinator = Coordinator::from_config(&config).unwrap();
    let current = coordinator.current_access_point().await.unwrap();

    assert_eq!(current.url, "https://zlib-official.example");
    assert_eq!(current.label, "官方地址");
    assert_eq!(current.status, RecordStatus::Active);
    drop(coordinator);

    // A fresh process reads the cached snapshot without touching the source
    let restarted = Coordinator::from_config(&config).unwrap();
    let snapshot = restarted.snapshot().await;
    let urls: Vec<&str> = snapshot.records.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec!["https://zlib-official.example", "https://zlib-mirror.example/"]
    );
    assert_eq!(snapshot.records[1].label, "第三方镜像");
}

#[tokio::test]
async fn test_source_error_serves_expired_sqlite_snapshot() {
    let server = MockServer::start().await;
    mount_status(&server, 503).await;

    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("domains.db");
    let expired = StoredEntry::new(
        stored_snapshot("https://a.example"),
        Duration::from_secs(86_400),
        Utc::now() - chrono::Duration::days(5),
    )
    .unwrap();
    SqliteStore::new(&db)
        .unwrap()
        .put_entry("zlib:domains", &expired)
        .unwrap();

    let config = config_for(
        &server,
        &format!("backend = \"sqlite\"\npath = \"{}\"", toml_path(&db)),
    );
    let coordinator = Coordinator::from_config(&config).unwrap();

    let current = coordinator.current_access_point().await.unwrap();
    assert_eq!(current.url, "https://a.example");
}

#[tokio::test]
async fn test_source_error_with_empty_store_is_none() {
    let server = MockServer::start().await;
    mount_status(&server, 500).await;

    let config = config_for(&server, "backend = \"memory\"");
    let coordinator = Coordinator::from_config(&config).unwrap();

    assert!(coordinator.current_access_point().await.is_none());
}

#[tokio::test]
async fn test_fallback_file_serves_after_restart_when_source_down() {
    let dir = tempfile::tempdir().unwrap();
    let fallback = dir.path().join("data").join("domains.json");
    let store_section = format!(
        "backend = \"memory\"\nfallback-path = \"{}\"",
        toml_path(&fallback)
    );

    // First run scrapes successfully and leaves the fallback file behind
    {
        let server = MockServer::start().await;
        mount_page(&server, 1).await;
        let coordinator = Coordinator::from_config(&config_for(&server, &store_section)).unwrap();
        assert!(coordinator.current_access_point().await.is_some());
    }
    assert!(fallback.exists());

    // Second run has an empty memory cache and an unreachable source
    let server = MockServer::start().await;
    mount_status(&server, 502).await;
    let coordinator = Coordinator::from_config(&config_for(&server, &store_section)).unwrap();

    let current = coordinator.current_access_point().await.unwrap();
    assert_eq!(current.url, "https://zlib-official.example");
}

#[tokio::test]
async fn test_page_without_marker_yields_none() {
    let server = MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::method("GET"))
        .respond_with(
            wiremock::ResponseTemplate::new(200)
                .set_body_string("<html><body><h2>站点维护中</h2></body></html>"),
        )
        .mount(&server)
        .await;

    let coordinator = Coordinator::from_config(&config_for(&server, "backend = \"memory\"")).unwrap();

    assert!(coordinator.current_access_point().await.is_none());
}

#[tokio::test]
async fn test_refresh_overwrites_live_cache() {
    let server = MockServer::start().await;
    mount_page(&server, 1).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");
    let config = config_for(
        &server,
        &format!("backend = \"file\"\npath = \"{}\"", toml_path(&path)),
    );
    let coordinator = Coordinator::from_config(&config).unwrap();

    let store = domain_scout::storage::FileStore::new(&path);
    store
        .set("zlib:domains", &stored_snapshot("https://old.example"), Duration::from_secs(3600))
        .unwrap();

    let snapshot = coordinator.refresh().await.unwrap();
    assert_eq!(snapshot.len(), 2);

    let stored = DomainSnapshot::from_json(&store.get("zlib:domains").unwrap().unwrap()).unwrap();
    assert_eq!(stored.current().unwrap().url, "https://zlib-official.example");
}

#[tokio::test]
async fn test_scheduler_startup_refresh_fills_store() {
    let server = MockServer::start().await;
    mount_page(&server, 1).await;

    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("domains.db");
    let config = config_for(
        &server,
        &format!("backend = \"sqlite\"\npath = \"{}\"", toml_path(&db)),
    );
    let coordinator = Arc::new(Coordinator::from_config(&config).unwrap());

    let mut scheduler = Scheduler::new(coordinator, config.schedule.clone());
    let startup = scheduler.start().await.unwrap().expect("run-on-start is enabled");
    assert!(startup.await.unwrap());
    scheduler.shutdown().await.unwrap();

    let stored = SqliteStore::new(Path::new(&db))
        .unwrap()
        .get("zlib:domains")
        .unwrap()
        .unwrap();
    let snapshot = DomainSnapshot::from_json(&stored).unwrap();
    assert_eq!(snapshot.len(), 2);
}

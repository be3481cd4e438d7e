//! Metadata service tests
//!
//! 页面抓取用静态 HTML 替代，不访问网络。

use std::collections::HashMap;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::App;
use async_trait::async_trait;
use serde_json::{Value, json};
use tempfile::TempDir;

use linktrio::api::types::{MetadataListResponse, MetadataResponse};
use linktrio::errors::{LinktrioError, Result};
use linktrio::runtime::lifetime::startup::MetadataContext;
use linktrio::runtime::modes::server::configure_metadata;
use linktrio::services::PageFetcher;
use linktrio::storage::{MetadataStorage, PageMetadata};

const EXAMPLE_PAGE: &str = r#"<!doctype html>
<html>
<head>
  <title>  Example Domain  </title>
  <meta name="description" content="This domain is for use in examples.">
  <link rel="icon" href="/static/icon.png">
</head>
<body><h1>Example</h1></body>
</html>"#;

const OG_PAGE: &str = r#"<html><head>
  <meta property="og:title" content="Open Graph Title">
  <meta property="og:description" content="Open Graph description">
</head><body></body></html>"#;

/// 按 URL 返回固定 HTML，未登记的 URL 视为抓取失败
#[derive(Default)]
struct StaticFetcher {
    pages: HashMap<String, String>,
}

impl StaticFetcher {
    fn with(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| LinktrioError::upstream(format!("connection refused: {}", url)))
    }
}

struct TestEnv {
    _dir: TempDir,
    storage: MetadataStorage,
}

async fn setup(fetcher: StaticFetcher) -> (TestEnv, MetadataContext) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("metadata.db");
    let storage = MetadataStorage::open(&format!("sqlite://{}?mode=rwc", db_path.display()))
        .await
        .expect("Failed to open metadata storage");

    let ctx = MetadataContext::new(storage.clone(), Arc::new(fetcher));
    (TestEnv { _dir: dir, storage }, ctx)
}

fn default_fetcher() -> StaticFetcher {
    StaticFetcher::default()
        .with("https://example.com/", EXAMPLE_PAGE)
        .with("https://og.example/post", OG_PAGE)
}

macro_rules! init_app {
    ($ctx:expr) => {
        test::init_service(App::new().configure(configure_metadata($ctx))).await
    };
}

// =============================================================================
// Fetch
// =============================================================================

#[actix_web::test]
async fn test_fetch_extracts_title_description_and_favicon() {
    let (env, ctx) = setup(default_fetcher()).await;
    let app = init_app!(ctx);

    let req = TestRequest::post()
        .uri("/api/metadata")
        .set_json(json!({ "short_code": "abc123", "long_url": "https://example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: MetadataResponse = test::read_body_json(resp).await;
    assert_eq!(body.short_code, "abc123");
    assert_eq!(body.url, "https://example.com");
    assert_eq!(body.title, "Example Domain");
    assert_eq!(body.description, "This domain is for use in examples.");
    assert_eq!(body.favicon_url, "https://example.com/static/icon.png");
    assert_eq!(body.status, "success");

    let stored = env.storage.get("abc123").await.unwrap().unwrap();
    assert_eq!(stored.title, "Example Domain");
}

#[actix_web::test]
async fn test_fetch_falls_back_to_open_graph_and_default_favicon() {
    let (_env, ctx) = setup(default_fetcher()).await;
    let app = init_app!(ctx);

    let req = TestRequest::post()
        .uri("/api/metadata")
        .set_json(json!({ "short_code": "og0001", "long_url": "https://og.example/post" }))
        .to_request();
    let body: MetadataResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.title, "Open Graph Title");
    assert_eq!(body.description, "Open Graph description");
    assert_eq!(body.favicon_url, "https://og.example/favicon.ico");
}

#[actix_web::test]
async fn test_fetch_failure_stores_placeholder() {
    let (env, ctx) = setup(StaticFetcher::default()).await;
    let app = init_app!(ctx);

    let req = TestRequest::post()
        .uri("/api/metadata")
        .set_json(json!({ "short_code": "down01", "long_url": "https://down.example/page" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: MetadataResponse = test::read_body_json(resp).await;
    assert_eq!(body.title, "Unable to fetch");
    assert_eq!(body.description, "Unable to fetch page content");
    assert_eq!(body.favicon_url, "https://down.example/favicon.ico");

    assert!(env.storage.get("down01").await.unwrap().is_some());
}

#[actix_web::test]
async fn test_fetch_with_unparseable_url_stores_placeholder() {
    let (_env, ctx) = setup(StaticFetcher::default()).await;
    let app = init_app!(ctx);

    let req = TestRequest::post()
        .uri("/api/metadata")
        .set_json(json!({ "short_code": "bad001", "long_url": "not a url" }))
        .to_request();
    let body: MetadataResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.title, "Unable to fetch");
    assert_eq!(body.favicon_url, "");
}

#[actix_web::test]
async fn test_fetch_requires_both_fields() {
    let (env, ctx) = setup(default_fetcher()).await;
    let app = init_app!(ctx);

    for payload in [
        json!({ "long_url": "https://example.com" }),
        json!({ "short_code": "abc123" }),
        json!({ "short_code": "", "long_url": "" }),
    ] {
        let req = TestRequest::post()
            .uri("/api/metadata")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload: {}", payload);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "E005");
    }
    assert_eq!(env.storage.count().await.unwrap(), 0);
}

#[actix_web::test]
async fn test_refetch_overwrites_previous_result() {
    let (env, ctx) = setup(default_fetcher()).await;
    let app = init_app!(ctx);

    for url in ["https://example.com", "https://og.example/post"] {
        let req = TestRequest::post()
            .uri("/api/metadata")
            .set_json(json!({ "short_code": "same01", "long_url": url }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    assert_eq!(env.storage.count().await.unwrap(), 1);
    let stored = env.storage.get("same01").await.unwrap().unwrap();
    assert_eq!(stored.title, "Open Graph Title");
    assert_eq!(stored.url, "https://og.example/post");
}

// =============================================================================
// Read
// =============================================================================

#[actix_web::test]
async fn test_get_by_code() {
    let (_env, ctx) = setup(default_fetcher()).await;
    let app = init_app!(ctx);

    let req = TestRequest::post()
        .uri("/api/metadata")
        .set_json(json!({ "short_code": "get001", "long_url": "https://example.com" }))
        .to_request();
    test::call_service(&app, req).await;

    let req = TestRequest::get().uri("/api/metadata/get001").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let meta: PageMetadata = test::read_body_json(resp).await;
    assert_eq!(meta.code, "get001");
    assert_eq!(meta.title, "Example Domain");
}

#[actix_web::test]
async fn test_get_unknown_code_returns_404() {
    let (_env, ctx) = setup(default_fetcher()).await;
    let app = init_app!(ctx);

    let req = TestRequest::get().uri("/api/metadata/missing").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "E006");
}

#[actix_web::test]
async fn test_list_returns_count_and_entries() {
    let (_env, ctx) = setup(default_fetcher()).await;
    let app = init_app!(ctx);

    let req = TestRequest::get().uri("/api/metadata").to_request();
    let empty: MetadataListResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(empty.count, 0);
    assert!(empty.metadata.is_empty());

    for code in ["list01", "list02"] {
        let req = TestRequest::post()
            .uri("/api/metadata")
            .set_json(json!({ "short_code": code, "long_url": "https://example.com" }))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = TestRequest::get().uri("/api/metadata").to_request();
    let list: MetadataListResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list.count, 2);
    assert_eq!(list.metadata.len(), 2);
}

#[actix_web::test]
async fn test_health_has_no_count_field() {
    let (_env, ctx) = setup(default_fetcher()).await;
    let app = init_app!(ctx);

    let req = TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "metadata-service");
    assert_eq!(body.as_object().unwrap().len(), 3);
}

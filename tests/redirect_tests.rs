//! Redirect service tests
//!
//! 短链接创建、跳转、短码分配冲突和 CORS。

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use actix_web::http::{StatusCode, header};
use actix_web::test::{self, TestRequest};
use actix_web::App;
use chrono::Utc;
use serde_json::{Value, json};
use tempfile::TempDir;

use linktrio::api::types::ShortenResponse;
use linktrio::runtime::lifetime::startup::RedirectContext;
use linktrio::runtime::modes::server::{configure_redirect, redirect_cors};
use linktrio::services::{
    CODE_ALPHABET, ClickNotification, ClickNotifier, CodeAllocator, CodeGenerator,
    RandomCodeGenerator,
};
use linktrio::storage::{LinkStorage, ShortLink};

// =============================================================================
// Helpers
// =============================================================================

/// 按顺序返回预设短码，用完后返回固定值
struct SequenceGenerator {
    codes: Mutex<VecDeque<String>>,
}

impl SequenceGenerator {
    fn new(codes: &[&str]) -> Self {
        Self {
            codes: Mutex::new(codes.iter().map(|c| c.to_string()).collect()),
        }
    }
}

impl CodeGenerator for SequenceGenerator {
    fn generate(&self, _length: usize) -> String {
        self.codes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| "zzzzzz".to_string())
    }
}

/// 记录所有点击通知
#[derive(Default)]
struct RecordingNotifier {
    seen: Mutex<Vec<ClickNotification>>,
}

impl RecordingNotifier {
    fn codes(&self) -> Vec<String> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.short_code.clone())
            .collect()
    }
}

impl ClickNotifier for RecordingNotifier {
    fn notify(&self, notification: ClickNotification) {
        self.seen.lock().unwrap().push(notification);
    }
}

struct TestEnv {
    _dir: TempDir,
    storage: LinkStorage,
    notifier: Arc<RecordingNotifier>,
}

async fn open_storage(dir: &TempDir) -> LinkStorage {
    let db_path = dir.path().join("redirect.db");
    LinkStorage::open(&format!("sqlite://{}?mode=rwc", db_path.display()))
        .await
        .expect("Failed to open redirect storage")
}

async fn setup(generator: Arc<dyn CodeGenerator>, max_attempts: u32) -> (TestEnv, RedirectContext) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let storage = open_storage(&dir).await;
    let notifier = Arc::new(RecordingNotifier::default());

    let ctx = RedirectContext::new(
        storage.clone(),
        CodeAllocator::new(generator, 6, max_attempts),
        notifier.clone(),
        "http://localhost:8000",
    );

    (
        TestEnv {
            _dir: dir,
            storage,
            notifier,
        },
        ctx,
    )
}

async fn seed(storage: &LinkStorage, code: &str, target: &str) {
    let inserted = storage
        .insert_new(&ShortLink {
            code: code.to_string(),
            target: target.to_string(),
            created_at: Utc::now(),
        })
        .await
        .expect("Failed to seed link");
    assert!(inserted);
}

macro_rules! init_app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .wrap(redirect_cors())
                .configure(configure_redirect($ctx)),
        )
        .await
    };
}

// =============================================================================
// Shorten
// =============================================================================

#[actix_web::test]
async fn test_shorten_returns_six_char_code() {
    let (env, ctx) = setup(Arc::new(RandomCodeGenerator), 10).await;
    let app = init_app!(ctx);

    let req = TestRequest::post()
        .uri("/api/shorten")
        .set_json(json!({ "long_url": "https://example.com/some/page" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: ShortenResponse = test::read_body_json(resp).await;
    assert_eq!(body.short_code.len(), 6);
    assert!(body.short_code.chars().all(|c| CODE_ALPHABET.contains(c)));
    assert_eq!(body.long_url, "https://example.com/some/page");
    assert_eq!(
        body.short_url,
        format!("http://localhost:8000/{}", body.short_code)
    );

    let stored = env.storage.get(&body.short_code).await.unwrap().unwrap();
    assert_eq!(stored.target, "https://example.com/some/page");
}

#[actix_web::test]
async fn test_shorten_same_url_twice_gives_distinct_codes() {
    let (_env, ctx) = setup(Arc::new(RandomCodeGenerator), 10).await;
    let app = init_app!(ctx);

    let mut codes = Vec::new();
    for _ in 0..2 {
        let req = TestRequest::post()
            .uri("/api/shorten")
            .set_json(json!({ "long_url": "https://example.com" }))
            .to_request();
        let body: ShortenResponse = test::call_and_read_body_json(&app, req).await;
        codes.push(body.short_code);
    }
    assert_ne!(codes[0], codes[1]);
}

#[actix_web::test]
async fn test_shorten_rejects_invalid_urls() {
    let (env, ctx) = setup(Arc::new(RandomCodeGenerator), 10).await;
    let app = init_app!(ctx);

    for bad in [
        json!({ "long_url": "" }),
        json!({ "long_url": "ftp://example.com/file" }),
        json!({ "long_url": "not a url" }),
        json!({}),
    ] {
        let req = TestRequest::post()
            .uri("/api/shorten")
            .set_json(&bad)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {}", bad);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "E005");
        assert!(body["error"].is_string());
    }

    assert_eq!(env.storage.count().await.unwrap(), 0);
}

#[actix_web::test]
async fn test_shorten_rejects_control_characters_in_url() {
    let (env, ctx) = setup(Arc::new(RandomCodeGenerator), 10).await;
    let app = init_app!(ctx);

    for bad in [
        "https://example.com/a\nb",
        "https://example.com/a\tb",
        "https://example.com/\r\nSet-Cookie: x=1",
    ] {
        let req = TestRequest::post()
            .uri("/api/shorten")
            .set_json(json!({ "long_url": bad }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "url: {:?}", bad);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "E005");
    }

    assert_eq!(env.storage.count().await.unwrap(), 0);
}

#[actix_web::test]
async fn test_shorten_rejects_malformed_json() {
    let (_env, ctx) = setup(Arc::new(RandomCodeGenerator), 10).await;
    let app = init_app!(ctx);

    let req = TestRequest::post()
        .uri("/api/shorten")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Code allocation
// =============================================================================

#[actix_web::test]
async fn test_allocation_skips_existing_code() {
    let generator = Arc::new(SequenceGenerator::new(&["taken1", "fresh1"]));
    let (env, ctx) = setup(generator, 10).await;
    seed(&env.storage, "taken1", "https://original.example").await;
    let app = init_app!(ctx);

    let req = TestRequest::post()
        .uri("/api/shorten")
        .set_json(json!({ "long_url": "https://new.example" }))
        .to_request();
    let body: ShortenResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.short_code, "fresh1");

    // 已有映射保持不变
    let existing = env.storage.get("taken1").await.unwrap().unwrap();
    assert_eq!(existing.target, "https://original.example");
}

#[actix_web::test]
async fn test_allocation_skips_reserved_codes() {
    let generator = Arc::new(SequenceGenerator::new(&["health", "API", "ok0001"]));
    let (_env, ctx) = setup(generator, 10).await;
    let app = init_app!(ctx);

    let req = TestRequest::post()
        .uri("/api/shorten")
        .set_json(json!({ "long_url": "https://example.com" }))
        .to_request();
    let body: ShortenResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.short_code, "ok0001");
}

#[actix_web::test]
async fn test_allocation_exhaustion_returns_503() {
    let generator = Arc::new(SequenceGenerator::new(&["same01", "same01", "same01"]));
    let (env, ctx) = setup(generator, 3).await;
    seed(&env.storage, "same01", "https://example.com").await;
    let app = init_app!(ctx);

    let req = TestRequest::post()
        .uri("/api/shorten")
        .set_json(json!({ "long_url": "https://other.example" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "E010");
    assert_eq!(env.storage.count().await.unwrap(), 1);
}

// =============================================================================
// Redirect
// =============================================================================

#[actix_web::test]
async fn test_redirect_returns_301_with_location() {
    let generator = Arc::new(SequenceGenerator::new(&[]));
    let (env, ctx) = setup(generator, 10).await;
    seed(&env.storage, "abc123", "https://example.com/target?q=1").await;
    let app = init_app!(ctx);

    // 同一短码多次访问结果一致
    for _ in 0..3 {
        let req = TestRequest::get().uri("/abc123").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "https://example.com/target?q=1"
        );
    }

    assert_eq!(env.notifier.codes(), vec!["abc123"; 3]);
}

#[actix_web::test]
async fn test_redirect_unknown_code_returns_404_json() {
    let (env, ctx) = setup(Arc::new(RandomCodeGenerator), 10).await;
    let app = init_app!(ctx);

    let req = TestRequest::get().uri("/nope42").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp.headers().get(header::LOCATION).is_none());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "E006");
    assert!(body["error"].as_str().unwrap().contains("nope42"));

    // 失败的跳转不发通知
    assert!(env.notifier.codes().is_empty());
}

#[actix_web::test]
async fn test_shorten_then_redirect() {
    let (_env, ctx) = setup(Arc::new(RandomCodeGenerator), 10).await;
    let app = init_app!(ctx);

    let req = TestRequest::post()
        .uri("/api/shorten")
        .set_json(json!({ "long_url": "  https://example.com/trim  " }))
        .to_request();
    let body: ShortenResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.long_url, "https://example.com/trim");

    let req = TestRequest::get()
        .uri(&format!("/{}", body.short_code))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "https://example.com/trim"
    );
}

// =============================================================================
// CORS & health
// =============================================================================

#[actix_web::test]
async fn test_cors_preflight_allows_any_origin() {
    let (_env, ctx) = setup(Arc::new(RandomCodeGenerator), 10).await;
    let app = init_app!(ctx);

    let req = TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/api/shorten")
        .insert_header((header::ORIGIN, "https://frontend.example"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let allowed_origin = resp
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .expect("missing allow-origin header");
    assert_eq!(allowed_origin, "https://frontend.example");
    assert!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_METHODS)
            .is_some()
    );
}

#[actix_web::test]
async fn test_health_reports_link_count() {
    let (env, ctx) = setup(Arc::new(RandomCodeGenerator), 10).await;
    seed(&env.storage, "h00001", "https://example.com").await;
    seed(&env.storage, "h00002", "https://example.org").await;
    let app = init_app!(ctx);

    let req = TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "redirect-service");
    assert_eq!(body["links"], 2);
    assert!(body["timestamp"].is_string());
}

#[actix_web::test]
async fn test_health_unhealthy_after_database_closed() {
    let (env, ctx) = setup(Arc::new(RandomCodeGenerator), 10).await;
    let app = init_app!(ctx);

    env.storage.get_db().clone().close().await.unwrap();

    let req = TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "unhealthy");
    assert!(body["error"].is_string());
}

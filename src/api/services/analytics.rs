use std::sync::Arc;

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::{debug, error};

use crate::api::types::{ClickEventAck, ClickEventPayload, CreateUrlRequest};
use crate::errors::LinktrioError;
use crate::services::{AnalyticsService, CreationService};

pub struct AnalyticsApiService;

impl AnalyticsApiService {
    /// `POST /create`，接受表单字段或 JSON 请求体
    pub async fn create(
        req: HttpRequest,
        body: web::Bytes,
        creation: web::Data<Arc<CreationService>>,
    ) -> Result<HttpResponse, LinktrioError> {
        let request = Self::parse_create_body(&req, &body)?;

        let record = creation.create(&request.long_url).await.inspect_err(|e| {
            error!("Create request for {} failed: {}", request.long_url, e);
        })?;

        Ok(HttpResponse::Ok().json(record))
    }

    fn parse_create_body(req: &HttpRequest, body: &[u8]) -> Result<CreateUrlRequest, LinktrioError> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.trim_start().starts_with("application/json"))
            .unwrap_or(false);

        if is_json {
            return serde_json::from_slice(body).map_err(|e| {
                LinktrioError::validation(format!("请求体不是合法的 JSON: {}", e))
            });
        }

        let long_url = url::form_urlencoded::parse(body)
            .find(|(key, _)| key == "long_url")
            .map(|(_, value)| value.into_owned())
            .unwrap_or_default();
        Ok(CreateUrlRequest { long_url })
    }

    /// `POST /api/events`
    pub async fn record_event(
        analytics: web::Data<Arc<AnalyticsService>>,
        body: web::Json<ClickEventPayload>,
    ) -> Result<HttpResponse, LinktrioError> {
        let (code, outcome) = analytics.record_click(body.into_inner()).await.inspect_err(|e| {
            if e.http_status().is_server_error() {
                error!("Failed to record click event: {}", e);
            }
        })?;

        debug!("Click event accepted for {} ({:?})", code, outcome);
        Ok(HttpResponse::Ok().json(ClickEventAck {
            status: "recorded".to_string(),
            short_code: code,
        }))
    }

    /// `GET /api/stats`
    pub async fn stats(
        analytics: web::Data<Arc<AnalyticsService>>,
    ) -> Result<HttpResponse, LinktrioError> {
        let stats = analytics.stats().await.inspect_err(|e| {
            error!("Failed to compute stats: {}", e);
        })?;
        Ok(HttpResponse::Ok().json(stats))
    }
}

/// Analytics 路由配置
pub fn analytics_routes() -> actix_web::Scope {
    web::scope("")
        .route("/create", web::post().to(AnalyticsApiService::create))
        .route("/api/events", web::post().to(AnalyticsApiService::record_event))
        .route("/api/stats", web::get().to(AnalyticsApiService::stats))
}

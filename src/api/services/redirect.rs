use std::sync::Arc;

use actix_web::http::header;
use actix_web::{HttpResponse, web};
use tracing::{error, trace};

use crate::api::types::{ShortenRequest, ShortenResponse};
use crate::errors::LinktrioError;
use crate::services::LinkService;

pub struct RedirectService;

impl RedirectService {
    /// `POST /api/shorten`
    pub async fn shorten(
        service: web::Data<Arc<LinkService>>,
        body: web::Json<ShortenRequest>,
    ) -> Result<HttpResponse, LinktrioError> {
        let request = body.into_inner();

        let link = service.shorten(&request.long_url).await.inspect_err(|e| {
            if e.http_status().is_server_error() {
                error!("Failed to shorten {}: {}", request.long_url, e);
            }
        })?;

        Ok(HttpResponse::Ok().json(ShortenResponse {
            short_url: service.short_url(&link.code),
            short_code: link.code,
            long_url: link.target,
        }))
    }

    /// `GET /{code}`，成功时 301 并异步通知统计服务
    pub async fn handle_redirect(
        path: web::Path<String>,
        service: web::Data<Arc<LinkService>>,
    ) -> Result<HttpResponse, LinktrioError> {
        let code = path.into_inner();

        match service.follow(&code).await {
            Ok(link) => {
                trace!("Redirecting {} -> {}", code, link.target);
                Ok(HttpResponse::MovedPermanently()
                    .insert_header((header::LOCATION, link.target))
                    .finish())
            }
            Err(e) => {
                if !matches!(e, LinktrioError::NotFound(_)) {
                    error!("Database error during redirect lookup: {}", e);
                }
                Err(e)
            }
        }
    }
}

/// Redirect 路由配置
pub fn redirect_routes() -> actix_web::Scope {
    web::scope("")
        .route("/api/shorten", web::post().to(RedirectService::shorten))
        .route("/{code}", web::get().to(RedirectService::handle_redirect))
}

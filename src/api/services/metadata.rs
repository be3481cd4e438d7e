use std::sync::Arc;

use actix_web::{HttpResponse, web};
use tracing::error;

use crate::api::types::{MetadataListResponse, MetadataRequest, MetadataResponse};
use crate::errors::LinktrioError;
use crate::services::MetadataService;

pub struct MetadataApiService;

impl MetadataApiService {
    /// `POST /api/metadata`
    ///
    /// 抓取失败时仍返回 200，内容为占位结果。
    pub async fn fetch(
        service: web::Data<Arc<MetadataService>>,
        body: web::Json<MetadataRequest>,
    ) -> Result<HttpResponse, LinktrioError> {
        let request = body.into_inner();
        let meta = service
            .enrich(&request.short_code, &request.long_url)
            .await
            .inspect_err(|e| {
                if e.http_status().is_server_error() {
                    error!("Failed to store metadata for {}: {}", request.short_code, e);
                }
            })?;

        Ok(HttpResponse::Ok().json(MetadataResponse::from(meta)))
    }

    /// `GET /api/metadata/{short_code}`
    pub async fn get(
        path: web::Path<String>,
        service: web::Data<Arc<MetadataService>>,
    ) -> Result<HttpResponse, LinktrioError> {
        let meta = service.get(&path.into_inner()).await?;
        Ok(HttpResponse::Ok().json(meta))
    }

    /// `GET /api/metadata`
    pub async fn list(
        service: web::Data<Arc<MetadataService>>,
    ) -> Result<HttpResponse, LinktrioError> {
        let metadata = service.list().await.inspect_err(|e| {
            error!("Failed to list metadata: {}", e);
        })?;

        Ok(HttpResponse::Ok().json(MetadataListResponse {
            count: metadata.len(),
            metadata,
        }))
    }
}

/// Metadata 路由配置
pub fn metadata_routes() -> actix_web::Scope {
    web::scope("/api/metadata")
        .route("", web::post().to(MetadataApiService::fetch))
        .route("", web::get().to(MetadataApiService::list))
        .route("/{short_code}", web::get().to(MetadataApiService::get))
}

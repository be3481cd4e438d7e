use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use serde_json::{Value, json};
use tracing::{error, trace};

use crate::storage::StoreProbe;

/// 存储探测超时
const PROBE_TIMEOUT_SECS: u64 = 5;

/// Health Service
///
/// 直接探测存储，不经过业务服务。`count_field` 为 `None` 时
/// 响应中不带记录数。
#[derive(Clone)]
pub struct HealthService {
    service: &'static str,
    count_field: Option<&'static str>,
    probe: Arc<dyn StoreProbe>,
}

impl HealthService {
    pub fn new(
        service: &'static str,
        count_field: Option<&'static str>,
        probe: Arc<dyn StoreProbe>,
    ) -> Self {
        Self {
            service,
            count_field,
            probe,
        }
    }

    pub async fn health_check(health: web::Data<HealthService>) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let probe = tokio::time::timeout(
            Duration::from_secs(PROBE_TIMEOUT_SECS),
            health.probe.record_count(),
        )
        .await;

        let mut body = json!({
            "service": health.service,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let healthy = match probe {
            Ok(Ok(count)) => {
                if let (Some(field), Value::Object(map)) = (health.count_field, &mut body) {
                    map.insert(field.to_string(), json!(count));
                }
                true
            }
            Ok(Err(e)) => {
                error!("{} storage health check failed: {}", health.service, e);
                body["error"] = json!(format!("database error: {}", e));
                false
            }
            Err(_) => {
                error!("{} storage health check timeout", health.service);
                body["error"] = json!("timeout");
                false
            }
        };

        body["status"] = json!(if healthy { "healthy" } else { "unhealthy" });

        trace!(
            "Health check completed in {:?}, healthy: {}",
            start_time.elapsed(),
            healthy
        );

        let status = if healthy {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        HttpResponse::build(status).json(body)
    }
}

/// Health 路由
pub fn health_routes() -> actix_web::Resource {
    web::resource("/health")
        .route(web::get().to(HealthService::health_check))
        .route(web::head().to(HealthService::health_check))
}

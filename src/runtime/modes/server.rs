//! Server mode
//!
//! 三个服务各自的 HTTP 启动逻辑。路由注册放在 `configure_*` 中，
//! 测试可以直接复用。

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::http::header;
use actix_web::{App, HttpServer, web};
use anyhow::{Context, Result};
use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::api::json_config;
use crate::api::services::{analytics_routes, health_routes, metadata_routes, redirect_routes};
use crate::config::{AnalyticsConfig, MetadataConfig, RedirectConfig};
use crate::runtime::lifetime::shutdown::{close_database, wait_for_signal};
use crate::runtime::lifetime::startup::{
    ANALYTICS_SERVICE, AnalyticsContext, METADATA_SERVICE, MetadataContext, REDIRECT_SERVICE,
    RedirectContext, prepare_analytics_startup, prepare_metadata_startup,
    prepare_redirect_startup,
};

const KEEP_ALIVE_SECS: u64 = 30;

/// 跳转服务的 CORS：任意来源，GET/POST/OPTIONS，允许 Content-Type
pub fn redirect_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_header(header::CONTENT_TYPE)
        .max_age(3600)
}

pub fn configure_redirect(ctx: RedirectContext) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(ctx.link_service))
            .app_data(web::Data::new(ctx.health))
            .app_data(json_config())
            .service(health_routes())
            .service(redirect_routes());
    }
}

pub fn configure_analytics(ctx: AnalyticsContext) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(ctx.creation))
            .app_data(web::Data::new(ctx.analytics))
            .app_data(web::Data::new(ctx.health))
            .app_data(json_config())
            .service(health_routes())
            .service(analytics_routes());
    }
}

pub fn configure_metadata(ctx: MetadataContext) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(ctx.metadata))
            .app_data(web::Data::new(ctx.health))
            .app_data(json_config())
            .service(health_routes())
            .service(metadata_routes());
    }
}

pub async fn run_redirect(config: &RedirectConfig) -> Result<()> {
    let ctx = prepare_redirect_startup(config).await?;
    let db = ctx.db.clone();
    let bind_address = format!("{}:{}", config.host, config.port);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(redirect_cors())
            .configure(configure_redirect(ctx.clone()))
    })
    .keep_alive(std::time::Duration::from_secs(KEEP_ALIVE_SECS))
    .workers(config.workers.max(1))
    .disable_signals()
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    warn!("Redirect service listening on http://{}", bind_address);
    run_until_shutdown(REDIRECT_SERVICE, server, db).await
}

pub async fn run_analytics(config: &AnalyticsConfig) -> Result<()> {
    let ctx = prepare_analytics_startup(config).await?;
    let db = ctx.db.clone();
    let bind_address = format!("{}:{}", config.host, config.port);

    let server = HttpServer::new(move || App::new().configure(configure_analytics(ctx.clone())))
        .keep_alive(std::time::Duration::from_secs(KEEP_ALIVE_SECS))
        .workers(config.workers.max(1))
        .disable_signals()
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();

    warn!(
        "Analytics service listening on http://{} (redirect: {}, metadata: {})",
        bind_address, config.redirect_url, config.metadata_url
    );
    run_until_shutdown(ANALYTICS_SERVICE, server, db).await
}

pub async fn run_metadata(config: &MetadataConfig) -> Result<()> {
    let ctx = prepare_metadata_startup(config).await?;
    let db = ctx.db.clone();
    let bind_address = format!("{}:{}", config.host, config.port);

    let server = HttpServer::new(move || App::new().configure(configure_metadata(ctx.clone())))
        .keep_alive(std::time::Duration::from_secs(KEEP_ALIVE_SECS))
        .workers(config.workers.max(1))
        .disable_signals()
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();

    warn!("Metadata service listening on http://{}", bind_address);
    run_until_shutdown(METADATA_SERVICE, server, db).await
}

/// 运行到服务器退出或收到 Ctrl+C，然后关闭数据库
async fn run_until_shutdown(service: &str, server: Server, db: DatabaseConnection) -> Result<()> {
    let handle = server.handle();
    tokio::pin!(server);

    tokio::select! {
        res = &mut server => {
            res.with_context(|| format!("{} stopped with an error", service))?;
        }
        _ = wait_for_signal(service) => {
            let (_, res) = tokio::join!(handle.stop(true), &mut server);
            res.with_context(|| format!("{} failed to stop cleanly", service))?;
            warn!("{}: graceful shutdown completed", service);
        }
    }

    close_database(service, db).await;
    Ok(())
}

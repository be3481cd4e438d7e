//! 服务启动前的准备
//!
//! 打开各自的数据库、构造业务服务，得到可以注入 handler 的上下文。

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::api::services::HealthService;
use crate::config::{AnalyticsConfig, MetadataConfig, RedirectConfig};
use crate::services::{
    AnalyticsService, ClickNotifier, CodeAllocator, CreationService, HttpMetadataClient,
    HttpShortenerClient, LinkService, MetadataApi, MetadataService, PageFetcher, ShortenerApi,
    StatsLimits, UreqPageFetcher, notifier_for,
};
use crate::storage::{AnalyticsStorage, LinkStorage, MetadataStorage};

pub const REDIRECT_SERVICE: &str = "redirect-service";
pub const ANALYTICS_SERVICE: &str = "analytics-service";
pub const METADATA_SERVICE: &str = "metadata-service";

/// 跳转服务上下文
#[derive(Clone)]
pub struct RedirectContext {
    pub link_service: Arc<LinkService>,
    pub health: HealthService,
    pub db: DatabaseConnection,
}

impl RedirectContext {
    pub fn new(
        storage: LinkStorage,
        allocator: CodeAllocator,
        notifier: Arc<dyn ClickNotifier>,
        public_base_url: &str,
    ) -> Self {
        let db = storage.get_db().clone();
        let health = HealthService::new(REDIRECT_SERVICE, Some("links"), Arc::new(storage.clone()));
        let link_service = Arc::new(LinkService::new(
            storage,
            allocator,
            notifier,
            public_base_url,
        ));

        Self {
            link_service,
            health,
            db,
        }
    }
}

/// 统计服务上下文
#[derive(Clone)]
pub struct AnalyticsContext {
    pub creation: Arc<CreationService>,
    pub analytics: Arc<AnalyticsService>,
    pub health: HealthService,
    pub db: DatabaseConnection,
}

impl AnalyticsContext {
    pub fn new(
        storage: AnalyticsStorage,
        shortener: Arc<dyn ShortenerApi>,
        metadata: Arc<dyn MetadataApi>,
        limits: StatsLimits,
    ) -> Self {
        let db = storage.get_db().clone();
        let health = HealthService::new(ANALYTICS_SERVICE, Some("urls"), Arc::new(storage.clone()));

        Self {
            creation: Arc::new(CreationService::new(storage.clone(), shortener, metadata)),
            analytics: Arc::new(AnalyticsService::new(storage, limits)),
            health,
            db,
        }
    }
}

/// 元数据服务上下文
#[derive(Clone)]
pub struct MetadataContext {
    pub metadata: Arc<MetadataService>,
    pub health: HealthService,
    pub db: DatabaseConnection,
}

impl MetadataContext {
    pub fn new(storage: MetadataStorage, fetcher: Arc<dyn PageFetcher>) -> Self {
        let db = storage.get_db().clone();
        let health = HealthService::new(METADATA_SERVICE, None, Arc::new(storage.clone()));

        Self {
            metadata: Arc::new(MetadataService::new(storage, fetcher)),
            health,
            db,
        }
    }
}

pub async fn prepare_redirect_startup(config: &RedirectConfig) -> Result<RedirectContext> {
    let storage = LinkStorage::open(&config.database_url)
        .await
        .context("Failed to open redirect database")?;

    if config.analytics_url.trim().is_empty() {
        info!("analytics_url is empty, click notifications are disabled");
    }
    let notifier = notifier_for(
        &config.analytics_url,
        Duration::from_millis(config.notify_timeout_ms),
    );
    let allocator = CodeAllocator::with_random(config.code_length, config.max_attempts);

    Ok(RedirectContext::new(
        storage,
        allocator,
        notifier,
        &config.public_base_url,
    ))
}

pub async fn prepare_analytics_startup(config: &AnalyticsConfig) -> Result<AnalyticsContext> {
    let storage = AnalyticsStorage::open(&config.database_url)
        .await
        .context("Failed to open analytics database")?;

    let timeout = Duration::from_secs(config.upstream_timeout_secs);
    let shortener = Arc::new(HttpShortenerClient::new(&config.redirect_url, timeout));
    let metadata = Arc::new(HttpMetadataClient::new(&config.metadata_url, timeout));

    Ok(AnalyticsContext::new(
        storage,
        shortener,
        metadata,
        StatsLimits::from(config),
    ))
}

pub async fn prepare_metadata_startup(config: &MetadataConfig) -> Result<MetadataContext> {
    let storage = MetadataStorage::open(&config.database_url)
        .await
        .context("Failed to open metadata database")?;

    let fetcher = Arc::new(UreqPageFetcher::from_config(config));
    Ok(MetadataContext::new(storage, fetcher))
}

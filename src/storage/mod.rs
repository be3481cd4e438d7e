use async_trait::async_trait;

use crate::errors::Result;

pub mod backend;
pub mod models;

pub use backend::{AnalyticsStorage, EnrichmentUpdate, LinkStorage, MetadataStorage};
pub use models::{ClickEvent, ClickOutcome, EnrichmentStatus, PageMetadata, ShortLink, UrlRecord};

/// 健康检查使用的存储探针
#[async_trait]
pub trait StoreProbe: Send + Sync {
    /// 存储中的主记录数
    async fn record_count(&self) -> Result<u64>;
}

#[async_trait]
impl StoreProbe for LinkStorage {
    async fn record_count(&self) -> Result<u64> {
        self.count().await
    }
}

#[async_trait]
impl StoreProbe for AnalyticsStorage {
    async fn record_count(&self) -> Result<u64> {
        self.count_records().await
    }
}

#[async_trait]
impl StoreProbe for MetadataStorage {
    async fn record_count(&self) -> Result<u64> {
        self.count().await
    }
}

//! 统计服务的编排创建
//!
//! 先向跳转服务申请短码，再请求元数据服务补全，最后合并写入统计记录。
//! 跳转服务失败则整个请求失败；元数据服务失败只把记录标记为 failed。

use std::sync::Arc;

use tracing::{error, info, warn};

use super::upstream::{MetadataApi, ShortenerApi};
use crate::errors::{LinktrioError, Result};
use crate::storage::{AnalyticsStorage, EnrichmentStatus, EnrichmentUpdate, UrlRecord};
use crate::utils::validate_url;

pub struct CreationService {
    storage: AnalyticsStorage,
    shortener: Arc<dyn ShortenerApi>,
    metadata: Arc<dyn MetadataApi>,
}

impl CreationService {
    pub fn new(
        storage: AnalyticsStorage,
        shortener: Arc<dyn ShortenerApi>,
        metadata: Arc<dyn MetadataApi>,
    ) -> Self {
        Self {
            storage,
            shortener,
            metadata,
        }
    }

    pub async fn create(&self, long_url: &str) -> Result<UrlRecord> {
        validate_url(long_url)?;
        let long_url = long_url.trim();

        let shortened = self.shortener.shorten(long_url).await.map_err(|e| {
            error!("Redirect service failed to shorten {}: {}", long_url, e);
            match e {
                LinktrioError::Upstream(_) => e,
                other => LinktrioError::upstream(other.message().to_string()),
            }
        })?;

        let update = match self
            .metadata
            .enrich(&shortened.short_code, &shortened.long_url)
            .await
        {
            Ok(meta) => EnrichmentUpdate {
                code: shortened.short_code.clone(),
                target: shortened.long_url.clone(),
                title: Some(meta.title),
                description: Some(meta.description),
                favicon_url: Some(meta.favicon_url),
                status: EnrichmentStatus::Success,
            },
            Err(e) => {
                warn!(
                    "Metadata enrichment failed for {}, storing record as failed: {}",
                    shortened.short_code, e
                );
                EnrichmentUpdate {
                    code: shortened.short_code.clone(),
                    target: shortened.long_url.clone(),
                    title: None,
                    description: None,
                    favicon_url: None,
                    status: EnrichmentStatus::Failed,
                }
            }
        };

        let record = self.storage.upsert_enrichment(update).await?;
        info!(
            "URL record created: {} -> {} ({})",
            record.code, record.target, record.status
        );
        Ok(record)
    }
}

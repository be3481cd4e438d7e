//! 元数据补全服务
//!
//! 抓取目标页面并提取标题、描述和 favicon。抓取失败不会返回错误，
//! 而是写入占位结果。

pub mod extractor;
pub mod fetcher;

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::errors::{LinktrioError, Result};
use crate::storage::{MetadataStorage, PageMetadata};
use crate::utils::parse_target_url;

pub use extractor::{PageSummary, extract, fetch_failed};
pub use fetcher::{PageFetcher, UreqPageFetcher};

pub struct MetadataService {
    storage: MetadataStorage,
    fetcher: Arc<dyn PageFetcher>,
}

impl MetadataService {
    pub fn new(storage: MetadataStorage, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { storage, fetcher }
    }

    pub fn storage(&self) -> &MetadataStorage {
        &self.storage
    }

    /// 抓取并覆盖保存 `code` 对应的元数据
    pub async fn enrich(&self, code: &str, long_url: &str) -> Result<PageMetadata> {
        let code = code.trim();
        let long_url = long_url.trim();
        if code.is_empty() || long_url.is_empty() {
            return Err(LinktrioError::validation("short_code 和 long_url 均不能为空"));
        }

        let summary = self.summarize(long_url).await;
        let meta = PageMetadata {
            code: code.to_string(),
            url: long_url.to_string(),
            title: summary.title,
            description: summary.description,
            favicon_url: summary.favicon_url,
            fetched_at: Utc::now(),
        };

        self.storage.upsert(&meta).await?;
        info!("Metadata fetched for {}: {}", meta.code, meta.title);
        Ok(meta)
    }

    async fn summarize(&self, long_url: &str) -> PageSummary {
        let page_url = match parse_target_url(long_url) {
            Ok(url) => url,
            Err(e) => {
                warn!("Cannot fetch metadata for \"{}\": {}", long_url, e);
                return fetch_failed(None);
            }
        };

        match self.fetcher.fetch(page_url.as_str()).await {
            Ok(html) => extract(&html, &page_url),
            Err(e) => {
                warn!("Metadata fetch failed for {}: {}", page_url, e);
                fetch_failed(Some(&page_url))
            }
        }
    }

    pub async fn get(&self, code: &str) -> Result<PageMetadata> {
        self.storage
            .get(code)
            .await?
            .ok_or_else(|| LinktrioError::not_found(format!("元数据不存在: {}", code)))
    }

    pub async fn list(&self) -> Result<Vec<PageMetadata>> {
        self.storage.list_all().await
    }
}

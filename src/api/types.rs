//! 三个服务的请求与响应结构
//!
//! 服务之间的 HTTP 调用也复用这里的结构，保证两端字段一致。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::{PageMetadata, UrlRecord};

/// `POST /api/shorten`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShortenRequest {
    #[serde(default)]
    pub long_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub short_code: String,
    pub short_url: String,
    pub long_url: String,
}

/// `POST /api/events`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClickEventPayload {
    #[serde(default)]
    pub short_code: String,
    /// RFC3339；缺省表示当前时间
    #[serde(default)]
    pub clicked_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickEventAck {
    pub status: String,
    pub short_code: String,
}

/// `POST /api/metadata`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataRequest {
    #[serde(default)]
    pub short_code: String,
    #[serde(default)]
    pub long_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataResponse {
    pub short_code: String,
    pub url: String,
    pub title: String,
    pub description: String,
    pub favicon_url: String,
    pub status: String,
}

impl From<PageMetadata> for MetadataResponse {
    fn from(meta: PageMetadata) -> Self {
        Self {
            short_code: meta.code,
            url: meta.url,
            title: meta.title,
            description: meta.description,
            favicon_url: meta.favicon_url,
            status: "success".to_string(),
        }
    }
}

/// `GET /api/metadata`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataListResponse {
    pub count: usize,
    pub metadata: Vec<PageMetadata>,
}

/// `POST /create`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateUrlRequest {
    #[serde(default)]
    pub long_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentClick {
    pub short_code: String,
    pub long_url: String,
    pub clicked_at: DateTime<Utc>,
}

/// 某一天（UTC）的点击数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyClicks {
    /// YYYY-MM-DD
    pub date: String,
    pub clicks: u64,
}

/// `GET /api/stats`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_urls: u64,
    pub total_clicks: u64,
    pub top_urls: Vec<UrlRecord>,
    pub recent_clicks: Vec<RecentClick>,
    pub clicks_over_time: Vec<DailyClicks>,
    pub all_urls: Vec<UrlRecord>,
}

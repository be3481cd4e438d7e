use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// 跳转服务持有的短链接映射，创建后不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortLink {
    pub code: String,
    pub target: String,
    pub created_at: DateTime<Utc>,
}

/// 统计服务收到的单次点击
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickEvent {
    #[serde(rename = "short_code")]
    pub code: String,
    pub clicked_at: DateTime<Utc>,
}

/// 最近一次元数据补全的结果
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EnrichmentStatus {
    #[default]
    Pending,
    Success,
    Failed,
}

/// 统计服务中每个短码的聚合记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlRecord {
    #[serde(rename = "short_code")]
    pub code: String,
    #[serde(rename = "long_url")]
    pub target: String,
    pub total_clicks: u64,
    pub first_seen: DateTime<Utc>,
    pub last_clicked: Option<DateTime<Utc>>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub favicon_url: Option<String>,
    pub status: EnrichmentStatus,
}

/// 元数据服务抓取到的页面信息，每个短码只保留最新一份
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMetadata {
    #[serde(rename = "short_code")]
    pub code: String,
    pub url: String,
    pub title: String,
    pub description: String,
    pub favicon_url: String,
    pub fetched_at: DateTime<Utc>,
}

/// 点击写入结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// 已有记录，计数 +1
    Counted,
    /// 未知短码，新建了一条 pending 记录
    CreatedPlaceholder,
}

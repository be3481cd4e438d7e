//! 点击聚合与仪表盘统计

use chrono::{DateTime, Days, NaiveDate, Utc};
use tracing::{debug, trace};

use crate::api::types::{ClickEventPayload, DailyClicks, RecentClick, StatsResponse};
use crate::config::AnalyticsConfig;
use crate::errors::{LinktrioError, Result};
use crate::storage::{AnalyticsStorage, ClickOutcome};

/// 统计查询的条数限制
#[derive(Debug, Clone, Copy)]
pub struct StatsLimits {
    pub top_urls: u64,
    pub recent_clicks: u64,
    pub trend_days: u32,
}

impl Default for StatsLimits {
    fn default() -> Self {
        Self {
            top_urls: 10,
            recent_clicks: 20,
            trend_days: 7,
        }
    }
}

impl From<&AnalyticsConfig> for StatsLimits {
    fn from(config: &AnalyticsConfig) -> Self {
        Self {
            top_urls: config.top_urls_limit,
            recent_clicks: config.recent_clicks_limit,
            trend_days: config.trend_days.max(1),
        }
    }
}

pub struct AnalyticsService {
    storage: AnalyticsStorage,
    limits: StatsLimits,
}

impl AnalyticsService {
    pub fn new(storage: AnalyticsStorage, limits: StatsLimits) -> Self {
        Self { storage, limits }
    }

    pub fn storage(&self) -> &AnalyticsStorage {
        &self.storage
    }

    /// 记录一次点击事件
    pub async fn record_click(&self, payload: ClickEventPayload) -> Result<(String, ClickOutcome)> {
        let code = payload.short_code.trim().to_string();
        if code.is_empty() {
            return Err(LinktrioError::validation("short_code 不能为空"));
        }

        let clicked_at = match payload.clicked_at.as_deref().map(str::trim) {
            None | Some("") => Utc::now(),
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .map_err(|e| {
                    LinktrioError::date_parse(format!("clicked_at '{}' 不是 RFC3339 时间: {}", raw, e))
                })?
                .with_timezone(&Utc),
        };

        let outcome = self.storage.record_click(&code, clicked_at).await?;
        if outcome == ClickOutcome::CreatedPlaceholder {
            debug!("Click for unknown code {}, placeholder record created", code);
        }
        Ok((code, outcome))
    }

    /// 仪表盘数据
    pub async fn stats(&self) -> Result<StatsResponse> {
        self.stats_at(Utc::now()).await
    }

    pub async fn stats_at(&self, now: DateTime<Utc>) -> Result<StatsResponse> {
        let total_urls = self.storage.count_records().await?;
        let total_clicks = self.storage.count_clicks().await?;
        let top_urls = self.storage.top_records(self.limits.top_urls).await?;
        let all_urls = self.storage.all_records().await?;

        let recent_clicks = self
            .storage
            .recent_clicks(self.limits.recent_clicks)
            .await?
            .into_iter()
            .map(|(event, long_url)| RecentClick {
                short_code: event.code,
                long_url,
                clicked_at: event.clicked_at,
            })
            .collect();

        let start_day = first_trend_day(now, self.limits.trend_days);
        let start = start_day.and_time(chrono::NaiveTime::MIN).and_utc();
        let times = self.storage.click_times_since(start).await?;
        let clicks_over_time = bucket_by_day(&times, start_day, self.limits.trend_days);

        trace!(
            "Stats computed: {} urls, {} clicks",
            total_urls, total_clicks
        );

        Ok(StatsResponse {
            total_urls,
            total_clicks,
            top_urls,
            recent_clicks,
            clicks_over_time,
            all_urls,
        })
    }
}

/// 趋势窗口的第一天（含今天共 `days` 天）
fn first_trend_day(now: DateTime<Utc>, days: u32) -> NaiveDate {
    let today = now.date_naive();
    today
        .checked_sub_days(Days::new(u64::from(days.max(1) - 1)))
        .unwrap_or(today)
}

/// 按 UTC 日期分桶，没有点击的日期补 0，最早的在前
pub fn bucket_by_day(times: &[DateTime<Utc>], start_day: NaiveDate, days: u32) -> Vec<DailyClicks> {
    let days = days.max(1) as usize;
    let mut counts = vec![0u64; days];

    for time in times {
        let offset = (time.date_naive() - start_day).num_days();
        if offset >= 0 && (offset as usize) < days {
            counts[offset as usize] += 1;
        }
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, clicks)| {
            let date = start_day
                .checked_add_days(Days::new(i as u64))
                .unwrap_or(start_day);
            DailyClicks {
                date: date.format("%Y-%m-%d").to_string(),
                clicks,
            }
        })
        .collect()
}

//! 点击通知
//!
//! 跳转成功后把点击事件推给统计服务。发送在独立的阻塞任务上完成，
//! 结果只记录日志：不重试、不排队，最多送达一次。

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ureq::Agent;

/// 发给统计服务的点击事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickNotification {
    pub short_code: String,
    /// RFC3339
    pub clicked_at: String,
}

impl ClickNotification {
    pub fn new(short_code: impl Into<String>, clicked_at: DateTime<Utc>) -> Self {
        Self {
            short_code: short_code.into(),
            clicked_at: clicked_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

pub trait ClickNotifier: Send + Sync {
    /// 投递通知后立即返回，不等待结果
    fn notify(&self, notification: ClickNotification);
}

/// 不发送任何通知，未配置统计服务地址时使用
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl ClickNotifier for NoopNotifier {
    fn notify(&self, notification: ClickNotification) {
        debug!(
            "Click notification for {} dropped (no analytics endpoint)",
            notification.short_code
        );
    }
}

/// 通过 HTTP POST 发送到 `{analytics_url}/api/events`
#[derive(Clone)]
pub struct HttpClickNotifier {
    agent: Agent,
    events_url: String,
}

impl HttpClickNotifier {
    pub fn new(analytics_url: &str, timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();

        Self {
            agent,
            events_url: format!("{}/api/events", analytics_url.trim_end_matches('/')),
        }
    }

    pub fn events_url(&self) -> &str {
        &self.events_url
    }

    /// 同步发送（在 spawn_blocking 中调用）
    fn send_sync(agent: &Agent, url: &str, notification: &ClickNotification) {
        match agent.post(url).send_json(notification) {
            Ok(resp) => debug!(
                "Click notification for {} delivered ({})",
                notification.short_code,
                resp.status()
            ),
            Err(ureq::Error::StatusCode(status)) => warn!(
                "Click notification for {} rejected by analytics: HTTP {}",
                notification.short_code, status
            ),
            Err(e) => warn!(
                "Click notification for {} to \"{}\" failed: {}",
                notification.short_code, url, e
            ),
        }
    }
}

impl ClickNotifier for HttpClickNotifier {
    fn notify(&self, notification: ClickNotification) {
        let agent = self.agent.clone();
        let url = self.events_url.clone();

        // 句柄直接丢弃，任务独立运行
        drop(tokio::task::spawn_blocking(move || {
            Self::send_sync(&agent, &url, &notification)
        }));
    }
}

/// 根据配置选择通知实现
pub fn notifier_for(analytics_url: &str, timeout: Duration) -> std::sync::Arc<dyn ClickNotifier> {
    if analytics_url.trim().is_empty() {
        std::sync::Arc::new(NoopNotifier)
    } else {
        std::sync::Arc::new(HttpClickNotifier::new(analytics_url, timeout))
    }
}

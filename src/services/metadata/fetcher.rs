use std::time::Duration;

use async_trait::async_trait;
use tracing::{trace, warn};
use ureq::Agent;

use crate::config::MetadataConfig;
use crate::errors::{LinktrioError, Result};

/// 获取页面 HTML
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// 基于 ureq 的抓取实现，带超时和重定向上限
pub struct UreqPageFetcher {
    agent: Agent,
    user_agent: String,
}

impl UreqPageFetcher {
    pub fn new(timeout: Duration, max_redirects: u32, user_agent: &str) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .max_redirects(max_redirects)
            .build()
            .into();

        Self {
            agent,
            user_agent: user_agent.to_string(),
        }
    }

    pub fn from_config(config: &MetadataConfig) -> Self {
        Self::new(
            Duration::from_secs(config.fetch_timeout_secs),
            config.max_redirects,
            &config.user_agent,
        )
    }

    /// 同步抓取（在 spawn_blocking 中调用）
    fn fetch_sync(agent: &Agent, url: &str, user_agent: &str) -> Result<String> {
        let resp = agent
            .get(url)
            .header("User-Agent", user_agent)
            .call()
            .map_err(|e| LinktrioError::upstream(format!("抓取 {} 失败: {}", url, e)))?;

        trace!("Fetched {} ({})", url, resp.status());

        resp.into_body()
            .read_to_string()
            .map_err(|e| LinktrioError::upstream(format!("读取 {} 的内容失败: {}", url, e)))
    }
}

#[async_trait]
impl PageFetcher for UreqPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let agent = self.agent.clone();
        let user_agent = self.user_agent.clone();
        let url = url.to_string();

        tokio::task::spawn_blocking(move || Self::fetch_sync(&agent, &url, &user_agent))
            .await
            .unwrap_or_else(|e| {
                warn!("Page fetch spawn_blocking failed: {}", e);
                Err(LinktrioError::upstream(format!("抓取任务失败: {}", e)))
            })
    }
}

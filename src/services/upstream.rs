//! 统计服务调用的上游服务客户端
//!
//! 使用 ureq 阻塞客户端，调用放在 spawn_blocking 中执行。

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{trace, warn};
use ureq::Agent;

use crate::api::types::{MetadataRequest, MetadataResponse, ShortenRequest, ShortenResponse};
use crate::errors::{LinktrioError, Result};

/// 跳转服务的创建接口
#[async_trait]
pub trait ShortenerApi: Send + Sync {
    async fn shorten(&self, long_url: &str) -> Result<ShortenResponse>;
}

/// 元数据服务的补全接口
#[async_trait]
pub trait MetadataApi: Send + Sync {
    async fn enrich(&self, short_code: &str, long_url: &str) -> Result<MetadataResponse>;
}

fn build_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// POST JSON 并解析 JSON 响应（同步，在 spawn_blocking 中调用）
fn post_json_sync<B, R>(agent: &Agent, url: &str, body: &B) -> Result<R>
where
    B: Serialize,
    R: DeserializeOwned,
{
    let resp = agent
        .post(url)
        .send_json(body)
        .map_err(|e| LinktrioError::upstream(format!("请求 {} 失败: {}", url, e)))?;

    let status = resp.status();
    if !status.is_success() {
        let detail = resp
            .into_body()
            .read_to_string()
            .unwrap_or_else(|e| format!("<unreadable body: {}>", e));
        return Err(LinktrioError::upstream(format!(
            "{} 返回 HTTP {}: {}",
            url,
            status.as_u16(),
            detail.trim()
        )));
    }

    resp.into_body()
        .read_json::<R>()
        .map_err(|e| LinktrioError::upstream(format!("解析 {} 的响应失败: {}", url, e)))
}

async fn post_json<B, R>(agent: &Agent, url: String, body: B) -> Result<R>
where
    B: Serialize + Send + 'static,
    R: DeserializeOwned + Send + 'static,
{
    let agent = agent.clone();
    tokio::task::spawn_blocking(move || post_json_sync(&agent, &url, &body))
        .await
        .unwrap_or_else(|e| {
            warn!("Upstream spawn_blocking failed: {}", e);
            Err(LinktrioError::upstream(format!("上游调用任务失败: {}", e)))
        })
}

/// 调用跳转服务 `POST /api/shorten`
pub struct HttpShortenerClient {
    agent: Agent,
    shorten_url: String,
}

impl HttpShortenerClient {
    pub fn new(redirect_url: &str, timeout: Duration) -> Self {
        Self {
            agent: build_agent(timeout),
            shorten_url: format!("{}/api/shorten", redirect_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl ShortenerApi for HttpShortenerClient {
    async fn shorten(&self, long_url: &str) -> Result<ShortenResponse> {
        trace!("Calling redirect service for {}", long_url);
        let body = ShortenRequest {
            long_url: long_url.to_string(),
        };
        post_json(&self.agent, self.shorten_url.clone(), body).await
    }
}

/// 调用元数据服务 `POST /api/metadata`
pub struct HttpMetadataClient {
    agent: Agent,
    metadata_url: String,
}

impl HttpMetadataClient {
    pub fn new(metadata_url: &str, timeout: Duration) -> Self {
        Self {
            agent: build_agent(timeout),
            metadata_url: format!("{}/api/metadata", metadata_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl MetadataApi for HttpMetadataClient {
    async fn enrich(&self, short_code: &str, long_url: &str) -> Result<MetadataResponse> {
        trace!("Calling metadata service for {}", short_code);
        let body = MetadataRequest {
            short_code: short_code.to_string(),
            long_url: long_url.to_string(),
        };
        post_json(&self.agent, self.metadata_url.clone(), body).await
    }
}

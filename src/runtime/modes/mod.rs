//! Mode routing
//!
//! 一个二进制承载三个服务，由命令行子命令选择运行哪一个。

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "server")]
pub use server::{run_analytics, run_metadata, run_redirect};

use clap::ValueEnum;

/// 可运行的服务
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ServiceKind {
    /// 跳转/创建服务
    Redirect,
    /// 统计/仪表盘服务
    Analytics,
    /// 元数据补全服务
    Metadata,
}

impl ServiceKind {
    pub fn name(&self) -> &'static str {
        match self {
            ServiceKind::Redirect => crate::runtime::lifetime::startup::REDIRECT_SERVICE,
            ServiceKind::Analytics => crate::runtime::lifetime::startup::ANALYTICS_SERVICE,
            ServiceKind::Metadata => crate::runtime::lifetime::startup::METADATA_SERVICE,
        }
    }
}

/// 按配置运行指定服务，直到退出
#[cfg(feature = "server")]
pub async fn run_service(kind: ServiceKind, config: &crate::config::StaticConfig) -> anyhow::Result<()> {
    match kind {
        ServiceKind::Redirect => run_redirect(&config.redirect).await,
        ServiceKind::Analytics => run_analytics(&config.analytics).await,
        ServiceKind::Metadata => run_metadata(&config.metadata).await,
    }
}

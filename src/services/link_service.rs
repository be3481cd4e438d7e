//! 跳转服务的业务逻辑
//!
//! 创建短链接、解析短码，并在解析成功后发出点击通知。

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use super::code_allocator::CodeAllocator;
use super::notifier::{ClickNotification, ClickNotifier};
use crate::errors::{LinktrioError, Result};
use crate::storage::{LinkStorage, ShortLink};
use crate::utils::validate_url;

pub struct LinkService {
    storage: LinkStorage,
    allocator: CodeAllocator,
    notifier: Arc<dyn ClickNotifier>,
    public_base_url: String,
}

impl LinkService {
    pub fn new(
        storage: LinkStorage,
        allocator: CodeAllocator,
        notifier: Arc<dyn ClickNotifier>,
        public_base_url: &str,
    ) -> Self {
        Self {
            storage,
            allocator,
            notifier,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn storage(&self) -> &LinkStorage {
        &self.storage
    }

    /// 对外可访问的短链接地址
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.public_base_url, code)
    }

    /// 校验地址并分配短码
    pub async fn shorten(&self, long_url: &str) -> Result<ShortLink> {
        // 保存用户提交的原始写法，只去掉首尾空白
        validate_url(long_url)?;
        self.allocator.allocate(&self.storage, long_url.trim()).await
    }

    /// 解析短码，不存在时返回 NotFound
    pub async fn resolve(&self, code: &str) -> Result<ShortLink> {
        match self.storage.get(code).await? {
            Some(link) => Ok(link),
            None => {
                debug!("Redirect link not found: {}", code);
                Err(LinktrioError::not_found(format!("短链接不存在: {}", code)))
            }
        }
    }

    /// 解析短码并投递点击通知
    pub async fn follow(&self, code: &str) -> Result<ShortLink> {
        let link = self.resolve(code).await?;
        self.notifier
            .notify(ClickNotification::new(link.code.clone(), Utc::now()));
        Ok(link)
    }
}

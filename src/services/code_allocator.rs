//! 短码分配
//!
//! 随机字节经 URL 安全的 base64 编码后截断到目标长度。
//! 先查重再插入；插入时的主键冲突同样算一次碰撞。

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::errors::{LinktrioError, Result};
use crate::storage::{LinkStorage, ShortLink};
use crate::utils::is_reserved_code;

/// 短码可能出现的全部字符
pub const CODE_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// 短码生成器
pub trait CodeGenerator: Send + Sync {
    fn generate(&self, length: usize) -> String;
}

/// 基于线程本地 CSPRNG 的生成器
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self, length: usize) -> String {
        // 每 3 字节编码为 4 个字符，多取几个字节保证截断前长度足够
        let byte_len = length * 3 / 4 + 3;
        let bytes: Vec<u8> = (0..byte_len).map(|_| rand::random::<u8>()).collect();

        let mut code = URL_SAFE_NO_PAD.encode(bytes);
        code.truncate(length);
        code
    }
}

pub struct CodeAllocator {
    generator: Arc<dyn CodeGenerator>,
    code_length: usize,
    max_attempts: u32,
}

impl CodeAllocator {
    pub fn new(generator: Arc<dyn CodeGenerator>, code_length: usize, max_attempts: u32) -> Self {
        Self {
            generator,
            code_length: code_length.max(1),
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn with_random(code_length: usize, max_attempts: u32) -> Self {
        Self::new(Arc::new(RandomCodeGenerator), code_length, max_attempts)
    }

    pub fn code_length(&self) -> usize {
        self.code_length
    }

    /// 为 `target` 分配一个新短码并写入存储
    ///
    /// 尝试次数用完时返回 `CodeSpaceExhausted`。
    pub async fn allocate(&self, storage: &LinkStorage, target: &str) -> Result<ShortLink> {
        for attempt in 1..=self.max_attempts {
            let code = self.generator.generate(self.code_length);

            if is_reserved_code(&code) {
                debug!("Attempt {}: code {} is reserved, redrawing", attempt, code);
                continue;
            }

            if storage.exists(&code).await? {
                debug!("Attempt {}: code {} already exists, redrawing", attempt, code);
                continue;
            }

            let link = ShortLink {
                code,
                target: target.to_string(),
                created_at: Utc::now(),
            };

            if storage.insert_new(&link).await? {
                info!("Short link created: {} -> {}", link.code, link.target);
                return Ok(link);
            }

            debug!(
                "Attempt {}: code {} was taken concurrently, redrawing",
                attempt, link.code
            );
        }

        warn!(
            "Short code allocation gave up after {} attempts",
            self.max_attempts
        );
        Err(LinktrioError::code_space_exhausted(format!(
            "无法在 {} 次尝试内分配唯一短码",
            self.max_attempts
        )))
    }
}

//! HTTP 接口层
//!
//! - `types`: 请求与响应结构
//! - `services`: 三个服务的路由与处理函数

pub mod services;
pub mod types;

use actix_web::web;

use crate::errors::LinktrioError;

/// JSON 请求体解析失败时返回 400 和统一的错误体
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| {
            LinktrioError::validation(format!("请求体不是合法的 JSON: {}", err)).into()
        })
}

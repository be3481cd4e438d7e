use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

#[derive(Debug, Clone)]
pub enum LinktrioError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    Serialization(String),
    DateParse(String),
    Upstream(String),
    CodeSpaceExhausted(String),
}

impl LinktrioError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            LinktrioError::DatabaseConfig(_) => "E001",
            LinktrioError::DatabaseConnection(_) => "E002",
            LinktrioError::DatabaseOperation(_) => "E003",
            LinktrioError::FileOperation(_) => "E004",
            LinktrioError::Validation(_) => "E005",
            LinktrioError::NotFound(_) => "E006",
            LinktrioError::Serialization(_) => "E007",
            LinktrioError::DateParse(_) => "E008",
            LinktrioError::Upstream(_) => "E009",
            LinktrioError::CodeSpaceExhausted(_) => "E010",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            LinktrioError::DatabaseConfig(_) => "Database Configuration Error",
            LinktrioError::DatabaseConnection(_) => "Database Connection Error",
            LinktrioError::DatabaseOperation(_) => "Database Operation Error",
            LinktrioError::FileOperation(_) => "File Operation Error",
            LinktrioError::Validation(_) => "Validation Error",
            LinktrioError::NotFound(_) => "Resource Not Found",
            LinktrioError::Serialization(_) => "Serialization Error",
            LinktrioError::DateParse(_) => "Date Parse Error",
            LinktrioError::Upstream(_) => "Upstream Service Error",
            LinktrioError::CodeSpaceExhausted(_) => "Code Space Exhausted",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            LinktrioError::DatabaseConfig(msg) => msg,
            LinktrioError::DatabaseConnection(msg) => msg,
            LinktrioError::DatabaseOperation(msg) => msg,
            LinktrioError::FileOperation(msg) => msg,
            LinktrioError::Validation(msg) => msg,
            LinktrioError::NotFound(msg) => msg,
            LinktrioError::Serialization(msg) => msg,
            LinktrioError::DateParse(msg) => msg,
            LinktrioError::Upstream(msg) => msg,
            LinktrioError::CodeSpaceExhausted(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码
    ///
    /// - 校验 / 日期解析 → 400
    /// - 不存在 → 404
    /// - 上游服务失败 → 502
    /// - 短码空间耗尽 → 503
    /// - 其余（存储、IO、序列化）→ 500
    pub fn http_status(&self) -> StatusCode {
        match self {
            LinktrioError::Validation(_) | LinktrioError::DateParse(_) => StatusCode::BAD_REQUEST,
            LinktrioError::NotFound(_) => StatusCode::NOT_FOUND,
            LinktrioError::Upstream(_) => StatusCode::BAD_GATEWAY,
            LinktrioError::CodeSpaceExhausted(_) => StatusCode::SERVICE_UNAVAILABLE,
            LinktrioError::DatabaseConfig(_)
            | LinktrioError::DatabaseConnection(_)
            | LinktrioError::DatabaseOperation(_)
            | LinktrioError::FileOperation(_)
            | LinktrioError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于启动失败时打印到终端）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LinktrioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 默认使用简洁格式
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LinktrioError {}

// 便捷的构造函数
impl LinktrioError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        LinktrioError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        LinktrioError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        LinktrioError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        LinktrioError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        LinktrioError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LinktrioError::NotFound(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        LinktrioError::Serialization(msg.into())
    }

    pub fn date_parse<T: Into<String>>(msg: T) -> Self {
        LinktrioError::DateParse(msg.into())
    }

    pub fn upstream<T: Into<String>>(msg: T) -> Self {
        LinktrioError::Upstream(msg.into())
    }

    pub fn code_space_exhausted<T: Into<String>>(msg: T) -> Self {
        LinktrioError::CodeSpaceExhausted(msg.into())
    }
}

/// 错误响应体：`{"error": "...", "code": "E00x"}`
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
    pub code: &'static str,
}

impl ResponseError for LinktrioError {
    fn status_code(&self) -> StatusCode {
        self.http_status()
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.http_status())
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .json(ErrorBody {
                error: self.message(),
                code: self.code(),
            })
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for LinktrioError {
    fn from(err: sea_orm::DbErr) -> Self {
        LinktrioError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for LinktrioError {
    fn from(err: std::io::Error) -> Self {
        LinktrioError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LinktrioError {
    fn from(err: serde_json::Error) -> Self {
        LinktrioError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for LinktrioError {
    fn from(err: chrono::ParseError) -> Self {
        LinktrioError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LinktrioError>;

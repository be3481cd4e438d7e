//! 目标地址校验
//!
//! 只接受带主机名的 http(s) 绝对地址。

use url::Url;

use crate::errors::LinktrioError;

#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    Empty,
    UnsupportedScheme(String),
    MissingHost,
    Malformed(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "long_url cannot be empty"),
            Self::UnsupportedScheme(scheme) => write!(
                f,
                "Unsupported scheme '{}', only http and https are allowed",
                scheme
            ),
            Self::MissingHost => write!(f, "long_url must contain a host"),
            Self::Malformed(msg) => write!(f, "Invalid long_url: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

impl From<UrlValidationError> for LinktrioError {
    fn from(err: UrlValidationError) -> Self {
        LinktrioError::validation(err.to_string())
    }
}

/// 解析并校验目标地址，返回解析后的 `Url`
pub fn parse_target_url(raw: &str) -> Result<Url, UrlValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    // Url::parse 会静默去掉制表符和换行，原样保存后无法作为 Location 返回
    if raw.chars().any(char::is_control) {
        return Err(UrlValidationError::Malformed(
            "long_url contains control characters".to_string(),
        ));
    }

    let url = Url::parse(raw).map_err(|e| UrlValidationError::Malformed(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlValidationError::UnsupportedScheme(other.to_string())),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlValidationError::MissingHost),
    }
}

/// 只关心是否合法时使用
pub fn validate_url(raw: &str) -> Result<(), UrlValidationError> {
    parse_target_url(raw).map(|_| ())
}

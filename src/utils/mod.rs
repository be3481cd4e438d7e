pub mod url_validator;

pub use url_validator::{UrlValidationError, parse_target_url, validate_url};

/// 与服务路由冲突、不能作为短码使用的保留字
pub const RESERVED_CODES: &[&str] = &["api", "health"];

pub fn is_reserved_code(code: &str) -> bool {
    RESERVED_CODES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(code))
}

/// 按字符数截断，不会切断多字节字符
pub fn truncate_chars(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_codes() {
        assert!(is_reserved_code("api"));
        assert!(is_reserved_code("HEALTH"));
        assert!(!is_reserved_code("apix"));
        assert!(!is_reserved_code("abc123"));
    }

    #[test]
    fn test_truncate_chars_counts_characters() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("标题测试", 2), "标题");
        assert_eq!(truncate_chars("", 5), "");
    }
}

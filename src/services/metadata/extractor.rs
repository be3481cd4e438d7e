//! HTML 元数据提取
//!
//! 每个字段对应一张有序的提取器列表，取第一个去空白后非空的结果。

use scraper::{Html, Selector};
use url::Url;

use crate::utils::truncate_chars;

pub const NO_TITLE: &str = "No title available";
pub const NO_DESCRIPTION: &str = "No description available";
pub const FETCH_FAILED_TITLE: &str = "Unable to fetch";
pub const FETCH_FAILED_DESCRIPTION: &str = "Unable to fetch page content";

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// 单个提取步骤
#[derive(Debug, Clone, Copy)]
pub enum Extractor {
    /// 元素的文本内容
    Text(&'static str),
    /// 元素的某个属性
    Attr(&'static str, &'static str),
}

pub const TITLE_EXTRACTORS: &[Extractor] = &[
    Extractor::Text("title"),
    Extractor::Attr(r#"meta[property="og:title"]"#, "content"),
];

pub const DESCRIPTION_EXTRACTORS: &[Extractor] = &[
    Extractor::Attr(r#"meta[name="description"]"#, "content"),
    Extractor::Attr(r#"meta[property="og:description"]"#, "content"),
];

pub const FAVICON_EXTRACTORS: &[Extractor] = &[
    // rel 按空白分隔的 token 匹配，"shortcut icon"、"alternate icon" 都算 icon
    Extractor::Attr(r#"link[rel~="icon"]"#, "href"),
    Extractor::Attr(r#"link[rel~="apple-touch-icon"]"#, "href"),
    Extractor::Attr(r#"link[rel~="apple-touch-icon-precomposed"]"#, "href"),
];

/// 提取结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSummary {
    pub title: String,
    pub description: String,
    pub favicon_url: String,
}

impl Extractor {
    fn run(&self, document: &Html) -> Option<String> {
        let (css, attr) = match *self {
            Extractor::Text(css) => (css, None),
            Extractor::Attr(css, attr) => (css, Some(attr)),
        };
        let selector = Selector::parse(css).ok()?;

        document.select(&selector).find_map(|element| {
            let value = match attr {
                None => element.text().collect::<String>(),
                Some(attr) => element.value().attr(attr)?.to_string(),
            };
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        })
    }
}

/// 依次执行提取器，返回第一个非空结果
pub fn first_match(document: &Html, extractors: &[Extractor]) -> Option<String> {
    extractors.iter().find_map(|extractor| extractor.run(document))
}

/// `scheme://host[:port]`
fn origin(page_url: &Url) -> Option<String> {
    let host = page_url.host_str()?;
    Some(match page_url.port() {
        Some(port) => format!("{}://{}:{}", page_url.scheme(), host, port),
        None => format!("{}://{}", page_url.scheme(), host),
    })
}

/// 站点根目录下的默认 favicon
pub fn default_favicon(page_url: &Url) -> Option<String> {
    origin(page_url).map(|origin| format!("{}/favicon.ico", origin))
}

/// 相对地址按站点根目录解析，绝对地址原样返回
pub fn resolve_favicon(page_url: &Url, href: &str) -> Option<String> {
    let root = Url::parse(&format!("{}/", origin(page_url)?)).ok()?;
    root.join(href.trim()).ok().map(String::from)
}

/// 从 HTML 提取标题、描述和 favicon
pub fn extract(html: &str, page_url: &Url) -> PageSummary {
    let document = Html::parse_document(html);

    let title = first_match(&document, TITLE_EXTRACTORS)
        .map(|t| truncate_chars(&t, MAX_TITLE_CHARS))
        .unwrap_or_else(|| NO_TITLE.to_string());

    let description = first_match(&document, DESCRIPTION_EXTRACTORS)
        .map(|d| truncate_chars(&d, MAX_DESCRIPTION_CHARS))
        .unwrap_or_else(|| NO_DESCRIPTION.to_string());

    let favicon_url = first_match(&document, FAVICON_EXTRACTORS)
        .and_then(|href| resolve_favicon(page_url, &href))
        .or_else(|| default_favicon(page_url))
        .unwrap_or_default();

    PageSummary {
        title,
        description,
        favicon_url,
    }
}

/// 抓取失败时的占位结果
pub fn fetch_failed(page_url: Option<&Url>) -> PageSummary {
    PageSummary {
        title: FETCH_FAILED_TITLE.to_string(),
        description: FETCH_FAILED_DESCRIPTION.to_string(),
        favicon_url: page_url.and_then(default_favicon).unwrap_or_default(),
    }
}

use serde::{Deserialize, Serialize};

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 三个服务共用一个配置文件，各自读取自己的段：
/// - redirect: 跳转/创建服务
/// - analytics: 统计/仪表盘服务
/// - metadata: 元数据补全服务
/// - logging: 日志配置（三个服务共用）
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub redirect: RedirectConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub metadata: MetadataConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：LT，分隔符：__
    /// 示例：LT__REDIRECT__PORT=9000
    pub fn load(path: Option<&str>) -> Self {
        use config::{Config, Environment, File};

        let path = path.unwrap_or("config.toml");

        let builder = Config::builder()
            // 1. 从 TOML 文件加载（可选）
            .add_source(File::with_name(path).required(false))
            // 2. 从环境变量覆盖，前缀 LT，分隔符 __
            .add_source(
                Environment::with_prefix("LT")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 跳转/创建服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_redirect_port")]
    pub port: u16,
    #[serde(default = "default_redirect_database_url")]
    pub database_url: String,
    /// 拼接 short_url 用的对外地址
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// 点击通知目标；为空则不发送通知
    #[serde(default = "default_analytics_url")]
    pub analytics_url: String,
    #[serde(default = "default_notify_timeout_ms")]
    pub notify_timeout_ms: u64,
    #[serde(default = "default_code_length")]
    pub code_length: usize,
    /// 短码碰撞时的最大尝试次数
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

/// 统计服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_analytics_port")]
    pub port: u16,
    #[serde(default = "default_analytics_database_url")]
    pub database_url: String,
    #[serde(default = "default_redirect_url")]
    pub redirect_url: String,
    #[serde(default = "default_metadata_url")]
    pub metadata_url: String,
    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,
    #[serde(default = "default_top_urls_limit")]
    pub top_urls_limit: u64,
    #[serde(default = "default_recent_clicks_limit")]
    pub recent_clicks_limit: u64,
    #[serde(default = "default_trend_days")]
    pub trend_days: u32,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

/// 元数据服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_metadata_port")]
    pub port: u16,
    #[serde(default = "default_metadata_database_url")]
    pub database_url: String,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    #[serde(default = "default_max_redirects")]
    pub max_redirects: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// text 或 json
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default)]
    pub enable_rotation: bool,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_redirect_port(),
            database_url: default_redirect_database_url(),
            public_base_url: default_public_base_url(),
            analytics_url: default_analytics_url(),
            notify_timeout_ms: default_notify_timeout_ms(),
            code_length: default_code_length(),
            max_attempts: default_max_attempts(),
            workers: default_workers(),
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_analytics_port(),
            database_url: default_analytics_database_url(),
            redirect_url: default_redirect_url(),
            metadata_url: default_metadata_url(),
            upstream_timeout_secs: default_upstream_timeout_secs(),
            top_urls_limit: default_top_urls_limit(),
            recent_clicks_limit: default_recent_clicks_limit(),
            trend_days: default_trend_days(),
            workers: default_workers(),
        }
    }
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_metadata_port(),
            database_url: default_metadata_database_url(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
            workers: default_workers(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            enable_rotation: false,
            max_backups: default_max_backups(),
        }
    }
}

// 默认值函数
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_redirect_port() -> u16 {
    8000
}

fn default_analytics_port() -> u16 {
    5000
}

fn default_metadata_port() -> u16 {
    5001
}

fn default_redirect_database_url() -> String {
    "sqlite://redirect.db".to_string()
}

fn default_analytics_database_url() -> String {
    "sqlite://analytics.db".to_string()
}

fn default_metadata_database_url() -> String {
    "sqlite://metadata.db".to_string()
}

fn default_public_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_analytics_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_redirect_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_metadata_url() -> String {
    "http://localhost:5001".to_string()
}

fn default_notify_timeout_ms() -> u64 {
    2000
}

fn default_code_length() -> usize {
    6
}

fn default_max_attempts() -> u32 {
    8
}

fn default_upstream_timeout_secs() -> u64 {
    5
}

fn default_top_urls_limit() -> u64 {
    10
}

fn default_recent_clicks_limit() -> u64 {
    20
}

fn default_trend_days() -> u32 {
    7
}

fn default_fetch_timeout_secs() -> u64 {
    5
}

fn default_max_redirects() -> u32 {
    5
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; linktrio-metadata/0.1)".to_string()
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(8)
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

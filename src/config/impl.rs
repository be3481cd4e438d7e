use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// 读取全局配置
///
/// 只在 `init_config*` 之后调用。返回的 `Arc` 可以随意克隆。
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get()
        .expect("Config not initialized. Call init_config() first.")
        .load_full()
}

/// 从当前目录的 `config.toml` 加载，文件不存在时使用默认值
pub fn init_config() {
    init_config_from(None);
}

/// 从指定路径加载配置，重复调用不会覆盖第一次的结果
///
/// # Examples
/// ```no_run
/// use linktrio::config::init_config_from;
/// init_config_from(Some("deploy/linktrio.toml"));
/// ```
pub fn init_config_from(path: Option<&str>) {
    CONFIG.get_or_init(|| ArcSwap::from_pointee(StaticConfig::load(path)));
}

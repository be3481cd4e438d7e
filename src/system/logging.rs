//! Logging system initialization
//!
//! This module initializes the tracing subscriber from the `[logging]`
//! section of the configuration. All three services share it.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;

use crate::config::LoggingConfig;
use crate::errors::{LinktrioError, Result};

/// Initialize logging system based on configuration
///
/// **Note**: This should be called only once during application startup,
/// after the configuration has been loaded.
///
/// # Returns
/// * `WorkerGuard` - Must be kept alive for the duration of the program
///   to ensure non-blocking log writes are flushed
pub fn init_logging(config: &LoggingConfig, service: &str) -> Result<WorkerGuard> {
    let writer = build_writer(config, service)?;

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.level.clone()));

    let subscriber_builder = tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(config.file.as_ref().is_none_or(|f| f.is_empty()));

    let init_result = if config.format == "json" {
        subscriber_builder.json().try_init()
    } else {
        subscriber_builder.try_init()
    };

    init_result.map_err(|e| {
        LinktrioError::file_operation(format!("Failed to install log subscriber: {}", e))
    })?;

    Ok(guard)
}

fn build_writer(
    config: &LoggingConfig,
    service: &str,
) -> Result<Box<dyn std::io::Write + Send + Sync>> {
    let Some(log_file) = config.file.as_deref().filter(|f| !f.is_empty()) else {
        return Ok(Box::new(std::io::stdout()));
    };

    if config.enable_rotation {
        // 按天滚动，文件名前缀带上服务名，避免三个服务写同一个文件
        let path = Path::new(log_file);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let stem = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("linktrio.log")
            .trim_end_matches(".log");

        let appender = rolling::Builder::new()
            .rotation(rolling::Rotation::DAILY)
            .filename_prefix(format!("{}-{}", stem, service))
            .filename_suffix("log")
            .max_log_files(config.max_backups as usize)
            .build(dir)
            .map_err(|e| {
                LinktrioError::file_operation(format!(
                    "Failed to create rolling log appender: {}",
                    e
                ))
            })?;
        return Ok(Box::new(appender));
    }

    // 不滚动，追加写入
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;
    Ok(Box::new(file))
}

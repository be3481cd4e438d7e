use std::time::Duration;

use sea_orm::DatabaseConnection;
use tokio::signal;
use tokio::time::timeout;
use tracing::{error, info, warn};

/// 关闭数据库的超时时间（秒）
const SHUTDOWN_TIMEOUT_SECS: u64 = 10;

/// 等待 Ctrl+C
pub async fn wait_for_signal(service: &str) {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("{}: shutdown signal received", service);
        }
        Err(e) => {
            warn!(
                "{}: failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
                service, e
            );
        }
    }
}

/// 关闭数据库连接池
///
/// 仍在途中的点击通知不会被等待。
pub async fn close_database(service: &str, db: DatabaseConnection) {
    match timeout(Duration::from_secs(SHUTDOWN_TIMEOUT_SECS), db.close()).await {
        Ok(Ok(())) => info!("{}: database connection closed", service),
        Ok(Err(e)) => error!("{}: failed to close database connection: {}", service, e),
        Err(_) => error!(
            "{}: closing database timed out after {} seconds",
            service, SHUTDOWN_TIMEOUT_SECS
        ),
    }
}

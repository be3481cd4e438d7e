use sea_orm::DatabaseConnection;
use tracing::info;

use crate::errors::{LinktrioError, Result};
use migration::MigratorTrait;

/// 连接 SQLite 数据库（带自动创建和性能优化）
pub async fn connect_sqlite(database_url: &str) -> Result<DatabaseConnection> {
    use sea_orm::SqlxSqliteConnector;
    use sea_orm::sqlx::SqlitePool;
    use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
    use std::str::FromStr;

    if database_url.is_empty() {
        return Err(LinktrioError::database_config("database_url 未设置"));
    }

    let opt = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| LinktrioError::database_config(format!("SQLite URL 解析失败: {}", e)))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(5))
        .pragma("temp_store", "memory");

    // 使用 sqlx 的连接池，连接的获取与归还由连接池负责
    let pool = SqlitePool::connect_with(opt).await.map_err(|e| {
        LinktrioError::database_connection(format!("无法连接到 SQLite 数据库: {}", e))
    })?;

    // 转换为 Sea-ORM 的 DatabaseConnection
    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

/// 运行指定服务的数据库迁移
pub async fn run_migrations<M: MigratorTrait>(db: &DatabaseConnection) -> Result<()> {
    M::up(db, None)
        .await
        .map_err(|e| LinktrioError::database_operation(format!("迁移失败: {}", e)))?;

    info!("Database migrations completed");
    Ok(())
}

/// 连接数据库并执行迁移
pub async fn open_database<M: MigratorTrait>(database_url: &str) -> Result<DatabaseConnection> {
    let db = connect_sqlite(database_url).await?;
    run_migrations::<M>(&db).await?;
    Ok(db)
}

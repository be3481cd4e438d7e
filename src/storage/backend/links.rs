//! 跳转服务的短链接存储
//!
//! 只有插入和查询，映射一旦写入就不再修改。

use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, SqlErr};
use tracing::{debug, info};

use super::connection::open_database;
use super::converters::{model_to_shortlink, shortlink_to_active_model};
use crate::errors::{LinktrioError, Result};
use crate::storage::models::ShortLink;
use migration::RedirectMigrator;
use migration::entities::short_link;

#[derive(Clone)]
pub struct LinkStorage {
    db: DatabaseConnection,
}

impl LinkStorage {
    /// 打开数据库并执行跳转服务的迁移
    pub async fn open(database_url: &str) -> Result<Self> {
        let db = open_database::<RedirectMigrator>(database_url).await?;
        info!("Redirect storage initialized");
        Ok(Self { db })
    }

    pub async fn exists(&self, code: &str) -> Result<bool> {
        let found = short_link::Entity::find_by_id(code.to_string())
            .one(&self.db)
            .await
            .map_err(|e| LinktrioError::database_operation(format!("查询短码失败: {}", e)))?;
        Ok(found.is_some())
    }

    /// 插入新映射
    ///
    /// 主键冲突时返回 `Ok(false)`，其余数据库错误照常返回。
    pub async fn insert_new(&self, link: &ShortLink) -> Result<bool> {
        let result = short_link::Entity::insert(shortlink_to_active_model(link))
            .exec_without_returning(&self.db)
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    debug!("Short code {} already taken at insert time", link.code);
                    Ok(false)
                }
                _ => Err(LinktrioError::database_operation(format!(
                    "插入短链接 '{}' 失败: {}",
                    link.code, e
                ))),
            },
        }
    }

    pub async fn get(&self, code: &str) -> Result<Option<ShortLink>> {
        let model = short_link::Entity::find_by_id(code.to_string())
            .one(&self.db)
            .await
            .map_err(|e| LinktrioError::database_operation(format!("查询短链接失败: {}", e)))?;
        Ok(model.map(model_to_shortlink))
    }

    pub async fn count(&self) -> Result<u64> {
        short_link::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| LinktrioError::database_operation(format!("统计短链接失败: {}", e)))
    }

    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}

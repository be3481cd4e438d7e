use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder};
use tracing::{debug, info};

use super::connection::open_database;
use super::converters::{model_to_page_metadata, page_metadata_to_active_model};
use crate::errors::{LinktrioError, Result};
use crate::storage::models::PageMetadata;
use migration::MetadataMigrator;
use migration::entities::page_metadata;

/// 元数据服务的存储，每个短码一行
#[derive(Clone)]
pub struct MetadataStorage {
    db: DatabaseConnection,
}

impl MetadataStorage {
    pub async fn open(database_url: &str) -> Result<Self> {
        let db = open_database::<MetadataMigrator>(database_url).await?;
        info!("Metadata storage initialized");
        Ok(Self { db })
    }

    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// 覆盖写入，旧的抓取结果不保留
    pub async fn upsert(&self, meta: &PageMetadata) -> Result<()> {
        page_metadata::Entity::insert(page_metadata_to_active_model(meta))
            .on_conflict(
                OnConflict::column(page_metadata::Column::ShortCode)
                    .update_columns([
                        page_metadata::Column::Url,
                        page_metadata::Column::Title,
                        page_metadata::Column::Description,
                        page_metadata::Column::FaviconUrl,
                        page_metadata::Column::FetchedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| {
                LinktrioError::database_operation(format!(
                    "Upsert 元数据 '{}' 失败: {}",
                    meta.code, e
                ))
            })?;

        debug!("Metadata stored for {}", meta.code);
        Ok(())
    }

    pub async fn get(&self, code: &str) -> Result<Option<PageMetadata>> {
        let model = page_metadata::Entity::find_by_id(code.to_string())
            .one(&self.db)
            .await
            .map_err(|e| LinktrioError::database_operation(format!("查询元数据失败: {}", e)))?;
        Ok(model.map(model_to_page_metadata))
    }

    /// 全部元数据，最近抓取的在前
    pub async fn list_all(&self) -> Result<Vec<PageMetadata>> {
        let models = page_metadata::Entity::find()
            .order_by_desc(page_metadata::Column::FetchedAt)
            .all(&self.db)
            .await
            .map_err(|e| LinktrioError::database_operation(format!("查询元数据列表失败: {}", e)))?;
        Ok(models.into_iter().map(model_to_page_metadata).collect())
    }

    pub async fn count(&self) -> Result<u64> {
        page_metadata::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| LinktrioError::database_operation(format!("统计元数据失败: {}", e)))
    }
}

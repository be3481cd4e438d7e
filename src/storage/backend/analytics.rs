//! 统计服务的存储
//!
//! 点击事件只追加写入；url_records 保存每个短码的聚合结果，
//! 在点击或元数据补全时更新。

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, DatabaseConnection, EntityTrait, ExprTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};
use tracing::{debug, info};

use super::connection::open_database;
use super::converters::{model_to_click_event, model_to_url_record, url_record_to_active_model};
use crate::errors::{LinktrioError, Result};
use crate::storage::models::{ClickEvent, ClickOutcome, EnrichmentStatus, UrlRecord};
use migration::AnalyticsMigrator;
use migration::entities::{click_event, url_record};

/// 元数据补全的写入内容
#[derive(Debug, Clone)]
pub struct EnrichmentUpdate {
    pub code: String,
    pub target: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub favicon_url: Option<String>,
    pub status: EnrichmentStatus,
}

#[derive(Clone)]
pub struct AnalyticsStorage {
    db: DatabaseConnection,
}

impl AnalyticsStorage {
    pub async fn open(database_url: &str) -> Result<Self> {
        let db = open_database::<AnalyticsMigrator>(database_url).await?;
        info!("Analytics storage initialized");
        Ok(Self { db })
    }

    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// 记录一次点击
    ///
    /// 事件写入和计数更新在同一个事务里完成。短码未知时新建一条
    /// target 为空、计数为 1 的 pending 记录。
    pub async fn record_click(&self, code: &str, clicked_at: DateTime<Utc>) -> Result<ClickOutcome> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LinktrioError::database_operation(format!("开始事务失败: {}", e)))?;

        click_event::Entity::insert(click_event::ActiveModel {
            id: NotSet,
            short_code: Set(code.to_string()),
            clicked_at: Set(clicked_at),
        })
        .exec_without_returning(&txn)
        .await
        .map_err(|e| LinktrioError::database_operation(format!("写入点击事件失败: {}", e)))?;

        let updated = url_record::Entity::update_many()
            .col_expr(
                url_record::Column::TotalClicks,
                Expr::col(url_record::Column::TotalClicks).add(1),
            )
            .col_expr(url_record::Column::LastClicked, Expr::value(clicked_at))
            .filter(url_record::Column::ShortCode.eq(code))
            .exec(&txn)
            .await
            .map_err(|e| LinktrioError::database_operation(format!("更新点击计数失败: {}", e)))?;

        let outcome = if updated.rows_affected == 0 {
            let placeholder = UrlRecord {
                code: code.to_string(),
                target: String::new(),
                total_clicks: 1,
                first_seen: clicked_at,
                last_clicked: Some(clicked_at),
                title: None,
                description: None,
                favicon_url: None,
                status: EnrichmentStatus::Pending,
            };
            url_record::Entity::insert(url_record_to_active_model(&placeholder))
                .exec_without_returning(&txn)
                .await
                .map_err(|e| {
                    LinktrioError::database_operation(format!("创建占位记录失败: {}", e))
                })?;
            ClickOutcome::CreatedPlaceholder
        } else {
            ClickOutcome::Counted
        };

        txn.commit()
            .await
            .map_err(|e| LinktrioError::database_operation(format!("提交事务失败: {}", e)))?;

        debug!("Click recorded for {} ({:?})", code, outcome);
        Ok(outcome)
    }

    /// 写入补全结果
    ///
    /// 已有记录只更新 target 和元数据字段，点击计数与 first_seen 保持不变。
    pub async fn upsert_enrichment(&self, update: EnrichmentUpdate) -> Result<UrlRecord> {
        let now = Utc::now();
        let fresh = UrlRecord {
            code: update.code.clone(),
            target: update.target,
            total_clicks: 0,
            first_seen: now,
            last_clicked: None,
            title: update.title,
            description: update.description,
            favicon_url: update.favicon_url,
            status: update.status,
        };

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LinktrioError::database_operation(format!("开始事务失败: {}", e)))?;

        url_record::Entity::insert(url_record_to_active_model(&fresh))
            .on_conflict(
                OnConflict::column(url_record::Column::ShortCode)
                    .update_columns([
                        url_record::Column::TargetUrl,
                        url_record::Column::Title,
                        url_record::Column::Description,
                        url_record::Column::FaviconUrl,
                        url_record::Column::Status,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
            .map_err(|e| {
                LinktrioError::database_operation(format!(
                    "Upsert 统计记录 '{}' 失败: {}",
                    update.code, e
                ))
            })?;

        let stored = url_record::Entity::find_by_id(update.code.clone())
            .one(&txn)
            .await
            .map_err(|e| LinktrioError::database_operation(format!("读取统计记录失败: {}", e)))?
            .ok_or_else(|| {
                LinktrioError::database_operation(format!("统计记录写入后丢失: {}", update.code))
            })?;

        txn.commit()
            .await
            .map_err(|e| LinktrioError::database_operation(format!("提交事务失败: {}", e)))?;

        Ok(model_to_url_record(stored))
    }

    pub async fn get_record(&self, code: &str) -> Result<Option<UrlRecord>> {
        let model = url_record::Entity::find_by_id(code.to_string())
            .one(&self.db)
            .await
            .map_err(|e| LinktrioError::database_operation(format!("查询统计记录失败: {}", e)))?;
        Ok(model.map(model_to_url_record))
    }

    pub async fn count_records(&self) -> Result<u64> {
        url_record::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| LinktrioError::database_operation(format!("统计记录数失败: {}", e)))
    }

    /// 全部点击事件数
    pub async fn count_clicks(&self) -> Result<u64> {
        click_event::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| LinktrioError::database_operation(format!("统计点击数失败: {}", e)))
    }

    /// 指定短码的点击事件数
    pub async fn clicks_for(&self, code: &str) -> Result<u64> {
        click_event::Entity::find()
            .filter(click_event::Column::ShortCode.eq(code))
            .count(&self.db)
            .await
            .map_err(|e| LinktrioError::database_operation(format!("统计点击数失败: {}", e)))
    }

    /// 点击数最多的记录
    pub async fn top_records(&self, limit: u64) -> Result<Vec<UrlRecord>> {
        let models = url_record::Entity::find()
            .order_by_desc(url_record::Column::TotalClicks)
            .order_by_asc(url_record::Column::ShortCode)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| LinktrioError::database_operation(format!("查询热门链接失败: {}", e)))?;
        Ok(models.into_iter().map(model_to_url_record).collect())
    }

    /// 全部记录，最新的在前
    pub async fn all_records(&self) -> Result<Vec<UrlRecord>> {
        let models = url_record::Entity::find()
            .order_by_desc(url_record::Column::FirstSeen)
            .order_by_asc(url_record::Column::ShortCode)
            .all(&self.db)
            .await
            .map_err(|e| LinktrioError::database_operation(format!("查询统计记录失败: {}", e)))?;
        Ok(models.into_iter().map(model_to_url_record).collect())
    }

    /// 最近的点击事件及其目标地址（未知目标为空字符串）
    pub async fn recent_clicks(&self, limit: u64) -> Result<Vec<(ClickEvent, String)>> {
        let events: Vec<ClickEvent> = click_event::Entity::find()
            .order_by_desc(click_event::Column::ClickedAt)
            .order_by_desc(click_event::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| LinktrioError::database_operation(format!("查询最近点击失败: {}", e)))?
            .into_iter()
            .map(model_to_click_event)
            .collect();

        if events.is_empty() {
            return Ok(Vec::new());
        }

        let codes: Vec<String> = events.iter().map(|e| e.code.clone()).collect();
        let targets: HashMap<String, String> = url_record::Entity::find()
            .select_only()
            .column(url_record::Column::ShortCode)
            .column(url_record::Column::TargetUrl)
            .filter(url_record::Column::ShortCode.is_in(codes))
            .into_tuple::<(String, String)>()
            .all(&self.db)
            .await
            .map_err(|e| LinktrioError::database_operation(format!("查询目标地址失败: {}", e)))?
            .into_iter()
            .collect();

        Ok(events
            .into_iter()
            .map(|event| {
                let target = targets.get(&event.code).cloned().unwrap_or_default();
                (event, target)
            })
            .collect())
    }

    /// `start` 之后所有点击的时间，按天分桶由调用方完成
    pub async fn click_times_since(&self, start: DateTime<Utc>) -> Result<Vec<DateTime<Utc>>> {
        click_event::Entity::find()
            .select_only()
            .column(click_event::Column::ClickedAt)
            .filter(click_event::Column::ClickedAt.gte(start))
            .into_tuple::<DateTime<Utc>>()
            .all(&self.db)
            .await
            .map_err(|e| LinktrioError::database_operation(format!("查询点击趋势失败: {}", e)))
    }
}

//! 三个服务各自的数据库迁移
//!
//! 每个服务拥有独立的 SQLite 文件，因此每个服务也有独立的 Migrator，
//! 只创建自己那一张表：
//! - `RedirectMigrator`: short_links
//! - `AnalyticsMigrator`: click_events + url_records
//! - `MetadataMigrator`: page_metadata

pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20251001_000001_short_links;
mod m20251001_000002_click_events;
mod m20251001_000003_url_records;
mod m20251001_000004_page_metadata;

/// 跳转服务迁移
pub struct RedirectMigrator;

#[async_trait::async_trait]
impl MigratorTrait for RedirectMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20251001_000001_short_links::Migration)]
    }
}

/// 统计服务迁移
pub struct AnalyticsMigrator;

#[async_trait::async_trait]
impl MigratorTrait for AnalyticsMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251001_000002_click_events::Migration),
            Box::new(m20251001_000003_url_records::Migration),
        ]
    }
}

/// 元数据服务迁移
pub struct MetadataMigrator;

#[async_trait::async_trait]
impl MigratorTrait for MetadataMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20251001_000004_page_metadata::Migration)]
    }
}

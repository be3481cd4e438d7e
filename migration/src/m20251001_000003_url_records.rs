//! URL 聚合记录表迁移
//!
//! url_records 以 short_code 为主键，保存点击计数与元数据补全结果。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UrlRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UrlRecords::ShortCode)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UrlRecords::TargetUrl).text().not_null())
                    .col(
                        ColumnDef::new(UrlRecords::TotalClicks)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UrlRecords::FirstSeen)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UrlRecords::LastClicked)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(UrlRecords::Title).text().null())
                    .col(ColumnDef::new(UrlRecords::Description).text().null())
                    .col(ColumnDef::new(UrlRecords::FaviconUrl).text().null())
                    .col(
                        ColumnDef::new(UrlRecords::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .to_owned(),
            )
            .await?;

        // top_urls 按点击数排序
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_url_records_total_clicks")
                    .table(UrlRecords::Table)
                    .col(UrlRecords::TotalClicks)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_url_records_total_clicks").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(UrlRecords::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UrlRecords {
    Table,
    ShortCode,
    TargetUrl,
    TotalClicks,
    FirstSeen,
    LastClicked,
    Title,
    Description,
    FaviconUrl,
    Status,
}

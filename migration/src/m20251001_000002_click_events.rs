//! 点击事件表迁移
//!
//! click_events 是只追加的事件日志，每条记录对应跳转服务发来的一次通知。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ClickEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClickEvents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ClickEvents::ShortCode)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClickEvents::ClickedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 单链接查询
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_click_events_short_code")
                    .table(ClickEvents::Table)
                    .col(ClickEvents::ShortCode)
                    .to_owned(),
            )
            .await?;

        // 时间范围查询（最近点击、按天趋势）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_click_events_clicked_at")
                    .table(ClickEvents::Table)
                    .col(ClickEvents::ClickedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_click_events_clicked_at").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_click_events_short_code").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ClickEvents::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ClickEvents {
    Table,
    Id,
    ShortCode,
    ClickedAt,
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 short_links 表，short_code 主键即唯一性兜底
        manager
            .create_table(
                Table::create()
                    .table(ShortLinks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ShortLinks::ShortCode)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ShortLinks::TargetUrl).text().not_null())
                    .col(
                        ColumnDef::new(ShortLinks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_short_links_created_at")
                    .table(ShortLinks::Table)
                    .col(ShortLinks::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_short_links_created_at").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ShortLinks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ShortLinks {
    Table,
    ShortCode,
    TargetUrl,
    CreatedAt,
}

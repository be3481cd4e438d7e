use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 每个 short_code 一行，重新抓取时整行覆盖
        manager
            .create_table(
                Table::create()
                    .table(PageMetadata::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PageMetadata::ShortCode)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PageMetadata::Url).text().not_null())
                    .col(ColumnDef::new(PageMetadata::Title).text().not_null())
                    .col(ColumnDef::new(PageMetadata::Description).text().not_null())
                    .col(ColumnDef::new(PageMetadata::FaviconUrl).text().not_null())
                    .col(
                        ColumnDef::new(PageMetadata::FetchedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PageMetadata::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PageMetadata {
    Table,
    ShortCode,
    Url,
    Title,
    Description,
    FaviconUrl,
    FetchedAt,
}

use std::str::FromStr;

use tracing::warn;

use crate::storage::models::{ClickEvent, EnrichmentStatus, PageMetadata, ShortLink, UrlRecord};
use migration::entities::{click_event, page_metadata, short_link, url_record};

/// 将 Sea-ORM Model 转换为 ShortLink
pub fn model_to_shortlink(model: short_link::Model) -> ShortLink {
    ShortLink {
        code: model.short_code,
        target: model.target_url,
        created_at: model.created_at,
    }
}

/// 将 ShortLink 转换为 ActiveModel（只用于插入）
pub fn shortlink_to_active_model(link: &ShortLink) -> short_link::ActiveModel {
    use sea_orm::ActiveValue::Set;

    short_link::ActiveModel {
        short_code: Set(link.code.clone()),
        target_url: Set(link.target.clone()),
        created_at: Set(link.created_at),
    }
}

pub fn model_to_click_event(model: click_event::Model) -> ClickEvent {
    ClickEvent {
        code: model.short_code,
        clicked_at: model.clicked_at,
    }
}

/// 将 url_records 行转换为 UrlRecord
///
/// 未识别的 status 按 pending 处理
pub fn model_to_url_record(model: url_record::Model) -> UrlRecord {
    let status = EnrichmentStatus::from_str(&model.status).unwrap_or_else(|_| {
        warn!(
            "Unknown enrichment status '{}' for {}, treating as pending",
            model.status, model.short_code
        );
        EnrichmentStatus::Pending
    });

    UrlRecord {
        code: model.short_code,
        target: model.target_url,
        total_clicks: model.total_clicks.max(0) as u64,
        first_seen: model.first_seen,
        last_clicked: model.last_clicked,
        title: model.title,
        description: model.description,
        favicon_url: model.favicon_url,
        status,
    }
}

pub fn url_record_to_active_model(record: &UrlRecord) -> url_record::ActiveModel {
    use sea_orm::ActiveValue::Set;

    url_record::ActiveModel {
        short_code: Set(record.code.clone()),
        target_url: Set(record.target.clone()),
        total_clicks: Set(record.total_clicks as i64),
        first_seen: Set(record.first_seen),
        last_clicked: Set(record.last_clicked),
        title: Set(record.title.clone()),
        description: Set(record.description.clone()),
        favicon_url: Set(record.favicon_url.clone()),
        status: Set(record.status.as_ref().to_string()),
    }
}

pub fn model_to_page_metadata(model: page_metadata::Model) -> PageMetadata {
    PageMetadata {
        code: model.short_code,
        url: model.url,
        title: model.title,
        description: model.description,
        favicon_url: model.favicon_url,
        fetched_at: model.fetched_at,
    }
}

pub fn page_metadata_to_active_model(meta: &PageMetadata) -> page_metadata::ActiveModel {
    use sea_orm::ActiveValue::Set;

    page_metadata::ActiveModel {
        short_code: Set(meta.code.clone()),
        url: Set(meta.url.clone()),
        title: Set(meta.title.clone()),
        description: Set(meta.description.clone()),
        favicon_url: Set(meta.favicon_url.clone()),
        fetched_at: Set(meta.fetched_at),
    }
}

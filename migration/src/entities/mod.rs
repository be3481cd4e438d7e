pub mod click_event;
pub mod page_metadata;
pub mod short_link;
pub mod url_record;

pub use click_event::Entity as ClickEventEntity;
pub use page_metadata::Entity as PageMetadataEntity;
pub use short_link::Entity as ShortLinkEntity;
pub use url_record::Entity as UrlRecordEntity;

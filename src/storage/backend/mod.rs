//! SeaORM SQLite 存储后端
//!
//! 每个服务各自打开一个 SQLite 文件，并只运行自己的 Migrator。

mod analytics;
mod connection;
mod converters;
mod links;
mod metadata;

pub use analytics::{AnalyticsStorage, EnrichmentUpdate};
pub use connection::{connect_sqlite, open_database, run_migrations};
pub use converters::{model_to_shortlink, model_to_url_record, shortlink_to_active_model};
pub use links::LinkStorage;
pub use metadata::MetadataStorage;

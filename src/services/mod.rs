//! Service layer for business logic
//!
//! HTTP handlers stay thin and delegate to the services here.

mod analytics_service;
pub mod code_allocator;
mod link_service;
pub mod metadata;
pub mod notifier;
mod orchestrator;
pub mod upstream;

pub use analytics_service::{AnalyticsService, StatsLimits, bucket_by_day};
pub use code_allocator::{CODE_ALPHABET, CodeAllocator, CodeGenerator, RandomCodeGenerator};
pub use link_service::LinkService;
pub use metadata::{MetadataService, PageFetcher, UreqPageFetcher};
pub use notifier::{ClickNotification, ClickNotifier, HttpClickNotifier, NoopNotifier, notifier_for};
pub use orchestrator::CreationService;
pub use upstream::{HttpMetadataClient, HttpShortenerClient, MetadataApi, ShortenerApi};

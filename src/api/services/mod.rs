pub mod analytics;
pub mod health;
pub mod metadata;
pub mod redirect;

pub use analytics::{AnalyticsApiService, analytics_routes};
pub use health::{HealthService, health_routes};
pub use metadata::{MetadataApiService, metadata_routes};
pub use redirect::{RedirectService, redirect_routes};

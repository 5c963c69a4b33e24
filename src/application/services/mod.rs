//! Business logic services for the application layer.

pub mod analytics_service;
pub mod auth_service;
pub mod default_domain_service;
pub mod link_service;

pub use analytics_service::{AnalyticsFilters, AnalyticsService};
pub use auth_service::AuthService;
pub use default_domain_service::DefaultDomainService;
pub use link_service::LinkService;

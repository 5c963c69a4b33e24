//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link-with-partner resolution and bulk deletion
//! - [`services::analytics_service::AnalyticsService`] - Partner and program analytics
//! - [`services::default_domain_service::DefaultDomainService`] - Reference domain flags
//! - [`services::auth_service::AuthService`] - API token authentication

pub mod services;

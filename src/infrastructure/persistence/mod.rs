//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries mapped through `FromRow` structs.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link lookups, partner resolution and deletion
//! - [`PgProgramRepository`] - Programs and enrollments
//! - [`PgDefaultDomainsRepository`] - Reference domain flags
//! - [`PgAnalyticsStore`] - Event ingestion and aggregation over `link_events`
//! - [`PgCommissionRepository`] - Commission earnings series
//! - [`PgTokenRepository`] - API token storage and resolution

pub mod pg_analytics_store;
pub mod pg_commission_repository;
pub mod pg_default_domains_repository;
pub mod pg_link_repository;
pub mod pg_program_repository;
pub mod pg_token_repository;

pub use pg_analytics_store::PgAnalyticsStore;
pub use pg_commission_repository::PgCommissionRepository;
pub use pg_default_domains_repository::PgDefaultDomainsRepository;
pub use pg_link_repository::PgLinkRepository;
pub use pg_program_repository::PgProgramRepository;
pub use pg_token_repository::PgTokenRepository;

use serde_json::json;
use std::str::FromStr;

use crate::error::AppError;

/// Parses a text column into a domain enum, reporting bad data as internal.
fn parse_column<T>(column: &'static str, value: &str) -> Result<T, AppError>
where
    T: FromStr<Err = String>,
{
    value.parse().map_err(|e: String| {
        tracing::error!(column, error = %e, "Unexpected column value");
        AppError::internal("Database error", json!({}))
    })
}

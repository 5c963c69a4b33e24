//! Analytics event store abstraction.

use crate::domain::analytics::{AnalyticsQuery, AnalyticsResult, NewLinkEvent};
use crate::error::AppError;
use async_trait::async_trait;

/// Store that ingests link events and answers aggregated queries.
///
/// Implementations trust the query's [`crate::domain::analytics::AnalyticsScope`];
/// authorization happens before a query is built.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgAnalyticsStore`] - aggregates `link_events`
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    /// Runs an aggregation; the result variant follows `query.group_by`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    async fn query(&self, query: &AnalyticsQuery) -> Result<AnalyticsResult, AppError>;

    /// Persists one event.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the referenced link does not exist.
    /// Returns [`AppError::Internal`] on store errors.
    async fn record_event(&self, event: NewLinkEvent) -> Result<(), AppError>;
}

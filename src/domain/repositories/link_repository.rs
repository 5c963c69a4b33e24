//! Repository trait for link data access.

use crate::domain::entities::{Discount, Link, LinkPartner};
use crate::error::AppError;
use async_trait::async_trait;

/// Flat result of the link/partner/discount join.
///
/// Both discounts are returned so precedence can be decided by
/// [`crate::domain::entities::resolve_effective_discount`].
#[derive(Debug, Clone)]
pub struct LinkPartnerRecord {
    pub link: Link,
    pub partner: Option<LinkPartner>,
    pub partner_discount: Option<Discount>,
    pub program_discount: Option<Discount>,
}

/// Repository interface for short links.
///
/// Key arguments are expected in their query form (see
/// [`crate::utils::key_codec::KeyCodec::key_to_query`]). With
/// `case_sensitive = false` keys are compared lowercased.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Finds a link together with its enrolled partner and both candidate
    /// discounts, in a single query.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_with_partner(
        &self,
        domain: &str,
        key: &str,
        case_sensitive: bool,
    ) -> Result<Option<LinkPartnerRecord>, AppError>;

    /// Finds a link by its `(domain, key)` pair.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_domain_key(
        &self,
        domain: &str,
        key: &str,
        case_sensitive: bool,
    ) -> Result<Option<Link>, AppError>;

    /// Loads the given links that belong to `workspace_id`. Unknown or
    /// foreign ids are silently skipped.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_many_in_workspace(
        &self,
        workspace_id: &str,
        link_ids: &[String],
    ) -> Result<Vec<Link>, AppError>;

    /// Deletes the given links of `workspace_id` and returns how many rows
    /// were removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete_many(&self, workspace_id: &str, link_ids: &[String]) -> Result<u64, AppError>;
}

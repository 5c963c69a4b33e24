//! Repository trait for per-workspace default domain flags.

use crate::domain::entities::{DefaultDomainFlags, DefaultDomains};
use crate::error::AppError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DefaultDomainsRepository: Send + Sync {
    /// Returns the stored flags, or `None` if the workspace has no row yet.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_workspace(&self, workspace_id: &str)
    -> Result<Option<DefaultDomains>, AppError>;

    /// Stores `flags` for the workspace, creating the row when missing.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn upsert(
        &self,
        workspace_id: &str,
        flags: DefaultDomainFlags,
    ) -> Result<DefaultDomains, AppError>;
}

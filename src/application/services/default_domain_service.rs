//! Reference domain selection per workspace.

use serde_json::json;
use std::sync::Arc;

use crate::domain::entities::{DefaultDomainFlags, DefaultDomains, ReferenceDomain, Workspace};
use crate::domain::repositories::DefaultDomainsRepository;
use crate::error::AppError;

pub const PAID_DOMAIN_MESSAGE: &str =
    "You can only use dub.link on a Pro plan and above. Upgrade to Pro to use this domain.";

/// Reads and updates which reference domains a workspace has enabled.
pub struct DefaultDomainService<R: DefaultDomainsRepository> {
    repository: Arc<R>,
}

impl<R: DefaultDomainsRepository> DefaultDomainService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Lists the enabled reference domains, optionally filtered by a
    /// case-insensitive substring. A workspace without a stored row has none.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list(
        &self,
        workspace_id: &str,
        search: Option<&str>,
    ) -> Result<Vec<String>, AppError> {
        let Some(stored) = self.repository.find_by_workspace(workspace_id).await? else {
            return Ok(Vec::new());
        };

        let needle = search.map(str::to_lowercase);

        Ok(stored
            .flags()
            .enabled()
            .into_iter()
            .map(|d| d.as_str().to_string())
            .filter(|name| needle.as_deref().is_none_or(|n| name.contains(n)))
            .collect())
    }

    /// Replaces the workspace's selection.
    ///
    /// Every name is validated before anything is written; a rejected
    /// request leaves the stored flags untouched.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a name outside [`ReferenceDomain`].
    /// Returns [`AppError::Forbidden`] when a free workspace selects a paid domain.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn update(
        &self,
        workspace: &Workspace,
        names: &[String],
    ) -> Result<DefaultDomains, AppError> {
        let selection = names
            .iter()
            .map(|name| {
                ReferenceDomain::parse(name).ok_or_else(|| {
                    AppError::bad_request(
                        "Invalid default domain",
                        json!({
                            "domain": name,
                            "allowed": ReferenceDomain::ALL.map(|d| d.as_str()),
                        }),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if workspace.plan.is_free() && selection.iter().any(ReferenceDomain::requires_paid_plan) {
            return Err(AppError::forbidden(
                PAID_DOMAIN_MESSAGE,
                json!({ "plan": workspace.plan.as_str() }),
            ));
        }

        let flags = DefaultDomainFlags::from_selection(&selection);
        let stored = self.repository.upsert(&workspace.id, flags).await?;

        tracing::info!(workspace_id = %workspace.id, reflist = stored.reflist, "Default domains updated");

        Ok(stored)
    }
}

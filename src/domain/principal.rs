//! Authenticated callers and their permissions.

use serde_json::json;
use std::collections::HashSet;

use crate::domain::entities::{Partner, Workspace};
use crate::error::AppError;

/// Permission carried by a workspace token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    DomainsRead,
    DomainsWrite,
    LinksRead,
    LinksWrite,
    FoldersWrite,
    AnalyticsRead,
}

impl Scope {
    pub const ALL: [Scope; 6] = [
        Scope::DomainsRead,
        Scope::DomainsWrite,
        Scope::LinksRead,
        Scope::LinksWrite,
        Scope::FoldersWrite,
        Scope::AnalyticsRead,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::DomainsRead => "domains.read",
            Scope::DomainsWrite => "domains.write",
            Scope::LinksRead => "links.read",
            Scope::LinksWrite => "links.write",
            Scope::FoldersWrite => "folders.write",
            Scope::AnalyticsRead => "analytics.read",
        }
    }
}

impl std::str::FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scope::ALL
            .into_iter()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| format!("unknown scope '{s}'"))
    }
}

/// A workspace acting through one of its API tokens.
#[derive(Debug, Clone)]
pub struct WorkspaceContext {
    pub workspace: Workspace,
    pub scopes: HashSet<Scope>,
}

impl WorkspaceContext {
    pub fn has(&self, scope: Scope) -> bool {
        self.scopes.contains(&scope)
    }

    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] when the token lacks `scope`.
    pub fn require(&self, scope: Scope) -> Result<(), AppError> {
        if self.has(scope) {
            return Ok(());
        }
        Err(AppError::forbidden(
            "The provided token does not have the required permission",
            json!({ "required_scope": scope.as_str() }),
        ))
    }
}

/// A partner acting on its own profile.
#[derive(Debug, Clone)]
pub struct PartnerContext {
    pub partner: Partner,
}

#[derive(Debug, Clone)]
pub enum Principal {
    Workspace(WorkspaceContext),
    Partner(PartnerContext),
}

//! Authentication service for API token validation.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::principal::{PartnerContext, Principal, Scope, WorkspaceContext};
use crate::domain::repositories::{TokenGrant, TokenRepository};
use crate::error::AppError;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

/// Hashes a raw token with HMAC-SHA256 keyed by `signing_secret`.
///
/// Returns a 64-character lowercase hex-encoded MAC. Shared with the admin
/// CLI so issued tokens match what the server verifies.
pub fn hash_token(signing_secret: &str, token: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Service for authenticating API requests via Bearer tokens.
///
/// An attacker with read-only access to the database cannot verify or forge
/// tokens without the server-side secret.
pub struct AuthService<R: TokenRepository> {
    repository: Arc<R>,
    signing_secret: String,
}

impl<R: TokenRepository> AuthService<R> {
    /// Creates a new authentication service.
    ///
    /// `signing_secret` must match the value used when tokens were created.
    pub fn new(repository: Arc<R>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    /// Resolves a raw token to the workspace or partner it acts for.
    ///
    /// On success the token's `last_used_at` is refreshed; a failure to do
    /// so is logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is unknown, revoked,
    /// or its owner no longer exists.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn authenticate(&self, token: &str) -> Result<Principal, AppError> {
        let token_hash = hash_token(&self.signing_secret, token);

        let grant = self
            .repository
            .resolve(&token_hash)
            .await?
            .ok_or_else(|| {
                AppError::unauthorized(
                    "Unauthorized",
                    json!({"reason": "Invalid or revoked token"}),
                )
            })?;

        if let Err(e) = self.repository.update_last_used(grant.token_id).await {
            tracing::warn!(token_id = grant.token_id, error = %e, "Failed to update token usage");
        }

        principal_from_grant(grant)
    }
}

fn principal_from_grant(grant: TokenGrant) -> Result<Principal, AppError> {
    match (grant.workspace, grant.partner) {
        (Some(workspace), None) => {
            let scopes: HashSet<Scope> = grant
                .scopes
                .iter()
                .filter_map(|s| match s.parse() {
                    Ok(scope) => Some(scope),
                    Err(e) => {
                        tracing::warn!(token_id = grant.token_id, error = %e, "Ignoring scope");
                        None
                    }
                })
                .collect();

            Ok(Principal::Workspace(WorkspaceContext { workspace, scopes }))
        }
        (None, Some(partner)) => Ok(Principal::Partner(PartnerContext { partner })),
        _ => Err(AppError::unauthorized(
            "Unauthorized",
            json!({"reason": "Token owner not found"}),
        )),
    }
}

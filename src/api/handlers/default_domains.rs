//! Handlers for the workspace default-domain selection.

use axum::{Extension, Json, extract::State};

use crate::api::dto::default_domains::{DefaultDomainsSearch, UpdateDefaultDomainsRequest};
use crate::api::extract::{ApiJson, ApiQuery};
use crate::domain::entities::DefaultDomains;
use crate::domain::principal::{Scope, WorkspaceContext};
use crate::error::AppError;
use crate::state::AppState;

/// Lists the reference domains enabled for the workspace.
///
/// # Endpoint
///
/// `GET /api/domains/default?search=`
///
/// Requires the `domains.read` scope. A workspace that never stored a
/// selection gets `[]`.
pub async fn list_default_domains_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<WorkspaceContext>,
    ApiQuery(params): ApiQuery<DefaultDomainsSearch>,
) -> Result<Json<Vec<String>>, AppError> {
    ctx.require(Scope::DomainsRead)?;

    let domains = state
        .default_domain_service
        .list(&ctx.workspace.id, params.search.as_deref())
        .await?;

    Ok(Json(domains))
}

/// Replaces the workspace's default-domain selection.
///
/// # Endpoint
///
/// `PATCH /api/domains/default`
///
/// # Request Body
///
/// ```json
/// { "defaultDomains": ["refl.ist"] }
/// ```
///
/// # Errors
///
/// - 400 for a name that is not a reference domain
/// - 403 without `domains.write`, or for `dub.link` on a free plan
pub async fn update_default_domains_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<WorkspaceContext>,
    ApiJson(payload): ApiJson<UpdateDefaultDomainsRequest>,
) -> Result<Json<DefaultDomains>, AppError> {
    ctx.require(Scope::DomainsWrite)?;

    let stored = state
        .default_domain_service
        .update(&ctx.workspace, &payload.default_domains)
        .await?;

    Ok(Json(stored))
}

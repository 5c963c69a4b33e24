//! Handlers for link lookup and bulk deletion.

use axum::{Extension, Json, extract::State};
use validator::Validate;

use crate::api::dto::links::{BulkDeleteRequest, BulkDeleteResponse, LinkInfoQuery};
use crate::api::extract::{ApiJson, ApiQuery};
use crate::domain::entities::LinkWithPartner;
use crate::domain::principal::{Scope, WorkspaceContext};
use crate::error::AppError;
use crate::state::AppState;

/// Resolves a workspace link with its partner and effective discount.
///
/// # Endpoint
///
/// `GET /api/links/info?domain=&key=`
///
/// Requires `links.read`. Links of other workspaces answer 404.
pub async fn link_info_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<WorkspaceContext>,
    ApiQuery(params): ApiQuery<LinkInfoQuery>,
) -> Result<Json<LinkWithPartner>, AppError> {
    ctx.require(Scope::LinksRead)?;
    params.validate()?;

    let link = state
        .link_service
        .link_info(&ctx, &params.domain, &params.key)
        .await?;

    Ok(Json(link))
}

/// Deletes up to 100 links of the workspace.
///
/// # Endpoint
///
/// `DELETE /api/links/bulk`
///
/// # Request Body
///
/// ```json
/// { "linkIds": ["link_1", "link_2"] }
/// ```
///
/// Requires `links.write`, plus `folders.write` when a selected link is in a
/// folder. Unknown ids and ids of other workspaces are skipped.
pub async fn bulk_delete_links_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<WorkspaceContext>,
    ApiJson(payload): ApiJson<BulkDeleteRequest>,
) -> Result<Json<BulkDeleteResponse>, AppError> {
    ctx.require(Scope::LinksWrite)?;
    payload.validate()?;

    let deleted_count = state
        .link_service
        .bulk_delete(&ctx, &payload.link_ids)
        .await?;

    Ok(Json(BulkDeleteResponse { deleted_count }))
}

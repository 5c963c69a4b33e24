//! Handlers for program-level revenue and commission series.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::api::dto::analytics::AnalyticsQueryParams;
use crate::api::extract::ApiQuery;
use crate::domain::analytics::{EarningsPoint, RevenuePoint};
use crate::domain::principal::{Scope, WorkspaceContext};
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/programs/{programId}/revenue`
///
/// Sales amount per bucket. Requires `analytics.read`; programs of other
/// workspaces answer 404.
pub async fn program_revenue_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<WorkspaceContext>,
    Path(program_id): Path<String>,
    ApiQuery(params): ApiQuery<AnalyticsQueryParams>,
) -> Result<Json<Vec<RevenuePoint>>, AppError> {
    ctx.require(Scope::AnalyticsRead)?;

    let points = state
        .analytics_service
        .program_revenue(&ctx.workspace.id, &program_id, params.into())
        .await?;

    Ok(Json(points))
}

/// `GET /api/programs/{programId}/commissions/timeseries`
///
/// Commission earnings per bucket. Requires `analytics.read`.
pub async fn commissions_timeseries_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<WorkspaceContext>,
    Path(program_id): Path<String>,
    ApiQuery(params): ApiQuery<AnalyticsQueryParams>,
) -> Result<Json<Vec<EarningsPoint>>, AppError> {
    ctx.require(Scope::AnalyticsRead)?;

    let points = state
        .analytics_service
        .commissions_timeseries(&ctx.workspace.id, &program_id, params.into())
        .await?;

    Ok(Json(points))
}

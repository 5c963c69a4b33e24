//! Handler for partner-facing program analytics.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::api::dto::analytics::AnalyticsQueryParams;
use crate::api::extract::ApiQuery;
use crate::domain::analytics::AnalyticsResult;
use crate::domain::principal::PartnerContext;
use crate::error::AppError;
use crate::state::AppState;

/// Analytics of the calling partner inside one program.
///
/// # Endpoint
///
/// `GET /api/partner-profile/programs/{programId}/analytics`
///
/// # Query Parameters
///
/// - `event`: `clicks` | `leads` | `sales` | `composite` (default)
/// - `groupBy`: `count` (default) | `timeseries` | `top_links` | `countries` | `devices` | `referers`
/// - `interval`: `24h` | `7d` | `30d` | `90d` (default) | `1y` | `mtd` | `qtd` | `ytd` | `all`
/// - `start`, `end`: RFC 3339; both must be set to override `interval`
/// - `timezone`: IANA name, default `UTC`
/// - `linkId`, or `domain` + `key`: narrow to one of the partner's links
///
/// The response shape follows `groupBy`: an object for `count`, an array
/// otherwise.
///
/// # Errors
///
/// Returns 404 if the partner is not enrolled or the link is not theirs.
pub async fn partner_analytics_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<PartnerContext>,
    Path(program_id): Path<String>,
    ApiQuery(params): ApiQuery<AnalyticsQueryParams>,
) -> Result<Json<AnalyticsResult>, AppError> {
    let result = state
        .analytics_service
        .partner_program_analytics(&ctx.partner.id, &program_id, params.into())
        .await?;

    Ok(Json(result))
}

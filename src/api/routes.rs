//! API route configuration.
//!
//! Workspace and partner endpoints sit behind different authentication
//! layers; see [`crate::api::middleware::auth`].

use crate::api::handlers::{
    bulk_delete_links_handler, commissions_timeseries_handler, link_info_handler,
    list_default_domains_handler, partner_analytics_handler, program_revenue_handler,
    update_default_domains_handler,
};
use crate::api::middleware::auth;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{delete, get},
};

/// Routes authenticated with a workspace API token.
///
/// # Endpoints
///
/// - `GET    /domains/default`                          - Enabled reference domains
/// - `PATCH  /domains/default`                          - Replace the selection
/// - `GET    /links/info`                               - Resolve a link with partner and discount
/// - `DELETE /links/bulk`                               - Delete up to 100 links
/// - `GET    /programs/{programId}/revenue`             - Sales revenue series
/// - `GET    /programs/{programId}/commissions/timeseries` - Commission earnings series
pub fn workspace_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/domains/default",
            get(list_default_domains_handler).patch(update_default_domains_handler),
        )
        .route("/links/info", get(link_info_handler))
        .route("/links/bulk", delete(bulk_delete_links_handler))
        .route("/programs/{program_id}/revenue", get(program_revenue_handler))
        .route(
            "/programs/{program_id}/commissions/timeseries",
            get(commissions_timeseries_handler),
        )
}

/// Routes authenticated with a partner token.
///
/// - `GET /partner-profile/programs/{programId}/analytics`
pub fn partner_routes() -> Router<AppState> {
    Router::new().route(
        "/partner-profile/programs/{program_id}/analytics",
        get(partner_analytics_handler),
    )
}

/// Both route groups with their authentication layers applied.
pub fn api_router(state: AppState) -> Router<AppState> {
    let workspace = workspace_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth::workspace_auth,
    ));
    let partner = partner_routes().route_layer(middleware::from_fn_with_state(
        state,
        auth::partner_auth,
    ));

    Router::new().merge(workspace).merge(partner)
}

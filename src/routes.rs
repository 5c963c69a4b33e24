//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{key}`   - Short link redirect (public)
//! - `GET  /health`  - Health check: DB, cache, event queue (public)
//! - `/api/*`        - REST API (Bearer token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket
//! - **Authentication** - Workspace or partner Bearer token
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let api_router = api::routes::api_router(state.clone()).layer(rate_limit::secure_layer());

    let public = Router::new()
        .route("/{key}", get(redirect_handler))
        .route("/health", get(health_handler))
        .layer(rate_limit::layer());

    let router = Router::new()
        .merge(public)
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

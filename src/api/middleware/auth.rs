//! Bearer token authentication middleware.
//!
//! Two layers share the token lookup and differ only in the principal they
//! accept. The resolved context is inserted as a request extension:
//!
//! ```rust,ignore
//! async fn handler(Extension(ctx): Extension<WorkspaceContext>) { /* ... */ }
//! ```

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::domain::principal::Principal;
use crate::{error::AppError, state::AppState};

/// Requires a workspace API token and inserts its
/// [`WorkspaceContext`](crate::domain::principal::WorkspaceContext).
///
/// # Errors
///
/// Returns `401 Unauthorized` if:
/// - Authorization header is missing or malformed
/// - Token is unknown or revoked
/// - Token belongs to a partner profile
///
/// Scope checks happen in the handlers (`403` when missing).
pub async fn workspace_auth(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    match authenticate(&st, &mut parts).await? {
        Principal::Workspace(ctx) => {
            parts.extensions.insert(ctx);
        }
        Principal::Partner(_) => return Err(wrong_principal("workspace")),
    }

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Requires a partner token and inserts its
/// [`PartnerContext`](crate::domain::principal::PartnerContext).
///
/// # Errors
///
/// Returns `401 Unauthorized` for missing, unknown or workspace tokens.
pub async fn partner_auth(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    match authenticate(&st, &mut parts).await? {
        Principal::Partner(ctx) => {
            parts.extensions.insert(ctx);
        }
        Principal::Workspace(_) => return Err(wrong_principal("partner")),
    }

    Ok(next.run(Request::from_parts(parts, body)).await)
}

async fn authenticate(st: &AppState, parts: &mut Parts) -> Result<Principal, AppError> {
    let AuthBearer(token) = AuthBearer::from_request_parts(parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    st.auth_service.authenticate(&token).await
}

fn wrong_principal(expected: &'static str) -> AppError {
    AppError::unauthorized(
        "Unauthorized",
        json!({"reason": format!("A {expected} token is required")}),
    )
}

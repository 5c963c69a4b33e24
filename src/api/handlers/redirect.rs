//! Handler for short link redirects.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use std::net::SocketAddr;
use tokio::sync::mpsc::error::TrySendError;

use crate::domain::link_event::LinkEvent;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::extract_domain::extract_domain_from_headers;

/// Country header set by the edge proxy.
const COUNTRY_HEADER: &str = "cf-ipcountry";

/// Redirects a short key to its destination URL.
///
/// # Endpoint
///
/// `GET /{key}`
///
/// # Request Flow
///
/// 1. Extract domain from the `Host` header
/// 2. Resolve `(domain, key)` through the cache, then the database
/// 3. Queue a click event for the background worker
/// 4. Return 302 Found
///
/// # Click Tracking
///
/// Events go to a bounded channel. When the queue is full the event is
/// dropped and `link_events_dropped_total` is incremented; the redirect is
/// never delayed.
///
/// # Errors
///
/// Returns 404 Not Found if no link matches.
/// Returns 400 Bad Request if the Host header is missing or invalid.
pub async fn redirect_handler(
    Path(key): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, AppError> {
    let domain = extract_domain_from_headers(&headers)?;

    let resolved = state
        .link_service
        .get_link_with_partner_decoded(&domain, &key)
        .await?
        .ok_or_else(|| {
            AppError::not_found("Link not found", json!({ "domain": domain, "key": key }))
        })?;

    let header_str = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    let event = LinkEvent::click(
        &resolved.link,
        Some(addr.ip().to_string()),
        header_str(header::USER_AGENT.as_str()),
        header_str(header::REFERER.as_str()),
        header_str(COUNTRY_HEADER),
    );

    match state.event_sender.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => {
            metrics::counter!("link_events_dropped_total").increment(1);
            tracing::warn!(link_id = %resolved.link.id, "Event queue full, click dropped");
        }
        Err(TrySendError::Closed(_)) => {
            metrics::counter!("link_events_dropped_total").increment(1);
            tracing::error!("Event queue closed");
        }
    }

    Ok((StatusCode::FOUND, [(header::LOCATION, resolved.link.url)]))
}

//! Domain extraction from HTTP request headers.

use crate::AppError;
use axum::http::{HeaderMap, header};
use serde_json::json;

/// Extracts the link domain from the `Host` header.
///
/// The port and a trailing dot are stripped and the name is lowercased, so
/// `Dub.SH.:443` becomes `dub.sh`. Bracketed IPv6 hosts keep their brackets.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the header is missing, empty, or not
/// valid UTF-8.
pub fn extract_domain_from_headers(headers: &HeaderMap) -> Result<String, AppError> {
    let host = headers
        .get(header::HOST)
        .ok_or_else(|| AppError::bad_request("Missing Host header", json!({})))?
        .to_str()
        .map_err(|_| AppError::bad_request("Invalid Host header", json!({})))?
        .trim();

    let domain = match host.strip_prefix('[') {
        Some(rest) => match rest.find(']') {
            Some(end) => &host[..end + 2],
            None => host,
        },
        None => host.split(':').next().unwrap_or(host),
    };

    let domain = domain.trim_end_matches('.').to_ascii_lowercase();
    if domain.is_empty() {
        return Err(AppError::bad_request("Invalid Host header", json!({})));
    }

    Ok(domain)
}

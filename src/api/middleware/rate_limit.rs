//! Rate limiting middleware using token bucket algorithm.
//!
//! Limits are keyed by the socket peer address, so the server must be
//! served with `into_make_service_with_connect_info::<SocketAddr>()`.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

type IpGovernorLayer =
    GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Public limiter for redirects and health: 2 rps, burst 100.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
pub fn layer() -> IpGovernorLayer {
    build(2, 100)
}

/// Stricter limiter for the authenticated API: 1 rps, burst 10.
pub fn secure_layer() -> IpGovernorLayer {
    build(1, 10)
}

fn build(per_second: u64, burst_size: u32) -> IpGovernorLayer {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(per_second)
            .burst_size(burst_size)
            .finish()
            .expect("rate limit period and burst are non-zero"),
    );

    GovernorLayer::new(governor_conf)
}

//! Request middleware.
//!
//! `auth` resolves Bearer tokens to workspace or partner contexts;
//! `rate_limit` and `tracing` wrap whole routers.

pub mod auth;
pub mod rate_limit;
pub mod tracing;

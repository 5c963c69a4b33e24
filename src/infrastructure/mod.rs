//! PostgreSQL and Redis adapters for the domain traits.
//!
//! - [`persistence`] - `Pg*` repositories and the analytics store
//! - [`cache`] - Resolved-link cache (Redis, or a no-op fallback)

pub mod cache;
pub mod persistence;

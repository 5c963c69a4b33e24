//! Cache service trait and error types.

use async_trait::async_trait;

use crate::domain::entities::LinkWithPartner;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Trait for caching resolved links.
///
/// Entries are keyed by the link's domain and its query-form key, so every
/// spelling that resolves to the same row shares one entry. Implementations
/// must be thread-safe and fail open: backend errors degrade to database
/// lookups instead of failing the request.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves a resolved link.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(link))` on cache hit
    /// - `Ok(None)` on cache miss or backend error
    async fn get_link(&self, domain: &str, key: &str) -> CacheResult<Option<LinkWithPartner>>;

    /// Stores a resolved link, with `ttl_seconds` overriding the default TTL.
    async fn set_link(
        &self,
        domain: &str,
        key: &str,
        link: &LinkWithPartner,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Removes a cached link. Used when a link is deleted.
    async fn invalidate(&self, domain: &str, key: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}

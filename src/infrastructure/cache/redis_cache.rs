//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use crate::domain::entities::LinkWithPartner;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, error, info, warn};

/// Redis cache for resolved links, stored as JSON strings.
///
/// Uses `ConnectionManager` for connection reuse and reconnects. All
/// operations are fail-open: errors are logged but don't propagate to callers.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: u64,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// `default_ttl_seconds` comes from `CACHE_TTL_SECONDS`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self {
            client: manager,
            default_ttl: default_ttl_seconds,
            key_prefix: "link:".to_string(),
        })
    }

    fn build_key(&self, domain: &str, key: &str) -> String {
        build_key(&self.key_prefix, domain, key)
    }
}

fn build_key(prefix: &str, domain: &str, key: &str) -> String {
    format!("{prefix}{domain}:{key}")
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_link(&self, domain: &str, key: &str) -> CacheResult<Option<LinkWithPartner>> {
        let cache_key = self.build_key(domain, key);
        let mut conn = self.client.clone();

        match conn.get::<_, Option<String>>(&cache_key).await {
            Ok(Some(raw)) => match serde_json::from_str::<LinkWithPartner>(&raw) {
                Ok(link) => {
                    debug!(key = %cache_key, "Cache HIT");
                    Ok(Some(link))
                }
                Err(e) => {
                    warn!(key = %cache_key, error = %e, "Discarding unreadable cache entry");
                    Ok(None)
                }
            },
            Ok(None) => {
                debug!(key = %cache_key, "Cache MISS");
                Ok(None)
            }
            Err(e) => {
                error!(key = %cache_key, error = %e, "Redis GET error");
                Ok(None)
            }
        }
    }

    async fn set_link(
        &self,
        domain: &str,
        key: &str,
        link: &LinkWithPartner,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let cache_key = self.build_key(domain, key);
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);

        let payload = serde_json::to_string(link)
            .map_err(|e| CacheError::OperationError(format!("Failed to encode link: {e}")))?;

        let mut conn = self.client.clone();
        match conn.set_ex::<_, _, ()>(&cache_key, payload, ttl).await {
            Ok(()) => {
                debug!(key = %cache_key, ttl, "Cache SET");
                Ok(())
            }
            Err(e) => {
                warn!(key = %cache_key, error = %e, "Redis SET error");
                Ok(())
            }
        }
    }

    async fn invalidate(&self, domain: &str, key: &str) -> CacheResult<()> {
        let cache_key = self.build_key(domain, key);
        let mut conn = self.client.clone();

        match conn.del::<_, i32>(&cache_key).await {
            Ok(deleted) => {
                if deleted > 0 {
                    debug!(key = %cache_key, "Cache INVALIDATE");
                }
                Ok(())
            }
            Err(e) => {
                warn!(key = %cache_key, error = %e, "Redis DEL error");
                Ok(())
            }
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}

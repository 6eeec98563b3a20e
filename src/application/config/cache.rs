use std::env;

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub redis_url: String,
    /// TTL applied to cached listing pages, in seconds.
    pub listing_ttl_seconds: u64,
}

impl CacheConfig {
    pub fn from_env() -> Self {
        Self {
            redis_url: env::var("ASSETBASE_REDIS_URL")
                .or_else(|_| env::var("REDIS_URL"))
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            listing_ttl_seconds: env::var("ASSETBASE_CACHE_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(86400),
        }
    }
}

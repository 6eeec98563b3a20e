use redis::aio::ConnectionManager;

use crate::config::CONFIG;

/// Try to connect to the cache store.
///
/// Caching is an optimization, not a correctness dependency: when Redis is
/// unreachable the application runs with caching disabled and every listing
/// request goes straight to the database.
pub async fn try_connect() -> Option<ConnectionManager> {
    let client = match redis::Client::open(CONFIG.cache.redis_url.as_str()) {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("Invalid cache store URL, caching disabled: {}", e);
            return None;
        }
    };

    match ConnectionManager::new(client).await {
        Ok(conn) => {
            tracing::info!("Cache store connection established");
            Some(conn)
        }
        Err(e) => {
            tracing::warn!("Cache store not available, caching disabled: {}", e);
            None
        }
    }
}

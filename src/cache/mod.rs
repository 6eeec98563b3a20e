//! Listing cache keyed by `{namespace}:{request fingerprint}`.
//!
//! The cache is an optimization layer over the relational store: every error
//! from the cache store is logged and degraded to a miss (on read) or a no-op
//! (on write/evict), never surfaced to the caller.

use std::marker::PhantomData;
use std::time::Duration;

use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::schemas::page::Pageable;

/// Request-fingerprint-keyed cache around a paginated listing query.
#[derive(Clone)]
pub struct ListingCache<T> {
    namespace: &'static str,
    ttl: Duration,
    conn: Option<ConnectionManager>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ListingCache<T>
where
    T: Serialize + DeserializeOwned,
{
    /// `conn` may be `None`, which disables the cache entirely: every get is
    /// a miss and every set/evict is a no-op.
    pub fn new(conn: Option<ConnectionManager>, namespace: &'static str, ttl: Duration) -> Self {
        Self {
            namespace,
            ttl,
            conn,
            _marker: PhantomData,
        }
    }

    fn key(&self, pageable: &Pageable) -> String {
        cache_key(self.namespace, pageable)
    }

    pub async fn get(&self, pageable: &Pageable) -> Option<T> {
        let mut conn = self.conn.clone()?;
        let key = self.key(pageable);

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::debug!("Discarding undecodable cache entry {}: {}", key, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Cache read failed for {}: {}", key, e);
                None
            }
        }
    }

    /// Store `value` under the request's key and pass it back unchanged, so
    /// a store read can be chained straight through the cache.
    pub async fn set(&self, pageable: &Pageable, value: T) -> T {
        if let Some(conn) = &self.conn {
            let mut conn = conn.clone();
            let key = self.key(pageable);
            match serde_json::to_string(&value) {
                Ok(raw) => {
                    if let Err(e) = conn
                        .set_ex::<_, _, ()>(&key, raw, self.ttl.as_secs())
                        .await
                    {
                        tracing::warn!("Cache write failed for {}: {}", key, e);
                    }
                }
                Err(e) => tracing::warn!("Cache serialization failed for {}: {}", key, e),
            }
        }
        value
    }

    pub async fn evict(&self) {
        evict_namespaces(self.conn.clone(), &[self.namespace]).await;
    }
}

/// Build the cache key for one listing request.
pub fn cache_key(namespace: &str, pageable: &Pageable) -> String {
    format!("{}:{}", namespace, pageable.fingerprint())
}

/// Drop every cached entry under the given namespaces in one batch. Failures
/// are logged and swallowed; stale entries may persist until their TTL fires.
pub async fn evict_namespaces(conn: Option<ConnectionManager>, namespaces: &[&str]) {
    let Some(mut conn) = conn else {
        return;
    };

    let mut all_keys: Vec<String> = Vec::new();
    for namespace in namespaces {
        match conn.keys::<_, Vec<String>>(format!("{}:*", namespace)).await {
            Ok(keys) => all_keys.extend(keys),
            Err(e) => tracing::warn!("Cache key scan failed for {}: {}", namespace, e),
        }
    }

    if !all_keys.is_empty() {
        if let Err(e) = conn.del::<_, ()>(all_keys).await {
            tracing::warn!("Cache eviction failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::page::Page;

    #[test]
    fn test_cache_key_is_namespace_plus_fingerprint() {
        let pageable = Pageable::new(20, 0).with_sort_str("name,asc");
        assert_eq!(
            cache_key("roles", &pageable),
            "roles:page=0&size=20&sort=name,asc"
        );
    }

    #[test]
    fn test_cache_keys_differ_per_namespace() {
        let pageable = Pageable::new(20, 0);
        assert_ne!(cache_key("roles", &pageable), cache_key("users", &pageable));
    }

    #[tokio::test]
    async fn test_disabled_cache_misses_and_passes_values_through() {
        let cache: ListingCache<Page<u32>> =
            ListingCache::new(None, "things", Duration::from_secs(60));
        let pageable = Pageable::new(20, 0);

        assert!(cache.get(&pageable).await.is_none());

        let page = Page::new(vec![1, 2, 3], pageable.clone()).with_total(3);
        let returned = cache.set(&pageable, page).await;
        assert_eq!(returned.content, vec![1, 2, 3]);

        // Eviction on a disabled cache is a no-op.
        cache.evict().await;
    }
}

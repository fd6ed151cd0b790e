//! Read-through / write-through caching for single-entity lookups.
//!
//! Only fetch-by-id calls go through here. Paged list endpoints are never
//! cached: their result sets are enumerable and would grow the cache
//! without bound.

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cache::CachePort;
use crate::error::DasResult;

/// Cache key for `id` under `prefix`: `"{prefix}:{id}"`.
pub fn cache_key(prefix: &str, id: &str) -> String {
    format!("{prefix}:{id}")
}

/// Serve `prefix:id` from `cache` when possible, otherwise run `fetch`.
///
/// - On a hit, `fetch` is never called.
/// - On a miss, a successful result is written back with `ttl`; a failed
///   one is never cached.
/// - Cache read/write failures and undecodable cached payloads degrade to
///   a plain fetch. They never change the returned result.
/// - With `cache = None` this is exactly `fetch().await`.
pub async fn cached_fetch<T, F, Fut>(
    cache: Option<&dyn CachePort>,
    prefix: &str,
    id: &str,
    ttl: Option<Duration>,
    fetch: F,
) -> DasResult<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = DasResult<T>>,
{
    let Some(cache) = cache else {
        return fetch().await;
    };
    let key = cache_key(prefix, id);

    match cache.get(&key).await {
        Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
            Ok(value) => {
                tracing::debug!(key = %key, "cache hit");
                return Ok(value);
            }
            Err(e) => tracing::warn!(key = %key, error = %e, "discarding undecodable cache entry"),
        },
        Ok(None) => tracing::debug!(key = %key, "cache miss"),
        Err(e) => tracing::warn!(key = %key, error = %e, "cache read failed"),
    }

    let result = fetch().await;

    if let Ok(value) = &result {
        match serde_json::to_string(value) {
            Ok(raw) => {
                if let Err(e) = cache.set(&key, raw, ttl).await {
                    tracing::warn!(key = %key, error = %e, "cache write failed");
                }
            }
            Err(e) => tracing::warn!(key = %key, error = %e, "value not serializable for cache"),
        }
    }

    result
}

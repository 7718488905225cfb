//! Cache store trait definition

use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

use super::expiration::Expiration;
use crate::domain::DomainError;

/// Thread-safe key/value store with per-entry expiration
///
/// Values are held as JSON strings so the trait stays dyn-compatible; the
/// typed surface lives in [`CacheStoreExt`]. Implementations own their
/// synchronization and may be shared freely behind an `Arc`.
#[async_trait]
pub trait CacheStore: Send + Sync + Debug {
    /// Returns true iff an unexpired entry exists for `key`
    async fn contains(&self, key: &str) -> Result<bool, DomainError>;

    /// Gets a raw JSON value, `None` when absent or expired
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Stores a raw JSON value, replacing any previous value and expiration
    async fn set_raw(
        &self,
        key: &str,
        value: &str,
        expiration: Expiration,
    ) -> Result<(), DomainError>;

    /// Removes an entry, returning whether one was present
    async fn remove(&self, key: &str) -> Result<bool, DomainError>;

    /// Remaining lifetime of an unexpired entry
    async fn ttl(&self, key: &str) -> Result<Option<Duration>, DomainError>;

    /// Drops every entry
    async fn clear(&self) -> Result<(), DomainError>;

    /// Approximate number of entries, expired ones not yet evicted included
    async fn len(&self) -> Result<usize, DomainError>;

    /// Window applied by the cache-aside path
    fn default_ttl(&self) -> Duration;
}

/// Rejects empty keys for the operations that require one
pub fn ensure_key(key: &str) -> Result<(), DomainError> {
    if key.is_empty() {
        return Err(DomainError::invalid_key("cache key must not be empty"));
    }

    Ok(())
}

/// Typed operations layered over [`CacheStore`]
pub trait CacheStoreExt: CacheStore {
    /// Gets a typed value; a value of another shape is reported as an error
    fn get<'a, V>(
        &'a self,
        key: &'a str,
    ) -> impl Future<Output = Result<Option<V>, DomainError>> + Send + 'a
    where
        V: DeserializeOwned + Send + 'a,
    {
        async move {
            match self.get_raw(key).await? {
                Some(data) => {
                    let value: V = serde_json::from_str(&data).map_err(|e| {
                        DomainError::cache(format!(
                            "Cached value for '{}' has unexpected shape: {}",
                            key, e
                        ))
                    })?;
                    Ok(Some(value))
                }
                None => Ok(None),
            }
        }
    }

    /// Non-failing lookup; any error is reported as not found
    fn try_get_value<'a, V>(&'a self, key: &'a str) -> impl Future<Output = Option<V>> + Send + 'a
    where
        V: DeserializeOwned + Send + 'a,
    {
        async move {
            match self.get::<V>(key).await {
                Ok(value) => value,
                Err(e) => {
                    tracing::debug!(key, error = %e, "Cache lookup failed, treating as miss");
                    None
                }
            }
        }
    }

    /// Cache-aside lookup
    ///
    /// On a miss `compute` runs on the caller's task and a `Some` result is
    /// stored for [`CacheStore::default_ttl`]. Concurrent misses on the same
    /// key each run `compute`; the last write wins.
    fn get_or_insert_with<'a, V, F, Fut>(
        &'a self,
        key: &'a str,
        compute: F,
    ) -> impl Future<Output = Result<Option<V>, DomainError>> + Send + 'a
    where
        V: Serialize + DeserializeOwned + Send + Sync + 'a,
        F: FnOnce() -> Fut + Send + 'a,
        Fut: Future<Output = Option<V>> + Send + 'a,
    {
        async move {
            if let Some(cached) = self.get::<V>(key).await? {
                return Ok(Some(cached));
            }

            let computed = compute().await;

            if let Some(value) = &computed {
                self.set(key, value, self.default_ttl()).await?;
            }

            Ok(computed)
        }
    }

    /// Stores a value with absolute expiration `now + ttl`
    ///
    /// A value that serializes to JSON `null` is not stored.
    fn set<'a, V>(
        &'a self,
        key: &'a str,
        value: &'a V,
        ttl: Duration,
    ) -> impl Future<Output = Result<(), DomainError>> + Send + 'a
    where
        V: Serialize + Send + Sync + ?Sized,
    {
        async move { store(self, key, value, Expiration::Absolute(ttl)).await }
    }

    /// Stores a value whose deadline moves forward on every read
    fn set_sliding<'a, V>(
        &'a self,
        key: &'a str,
        value: &'a V,
        window: Duration,
    ) -> impl Future<Output = Result<(), DomainError>> + Send + 'a
    where
        V: Serialize + Send + Sync + ?Sized,
    {
        async move { store(self, key, value, Expiration::Sliding(window)).await }
    }
}

async fn store<C, V>(
    cache: &C,
    key: &str,
    value: &V,
    expiration: Expiration,
) -> Result<(), DomainError>
where
    C: CacheStore + ?Sized,
    V: Serialize + Send + Sync + ?Sized,
{
    ensure_key(key)?;

    let data = serde_json::to_string(value)
        .map_err(|e| DomainError::cache(format!("Failed to serialize cache value: {}", e)))?;

    if data == "null" {
        return Ok(());
    }

    cache.set_raw(key, &data, expiration).await
}

// Blanket implementation for all types implementing CacheStore
impl<T: CacheStore + ?Sized> CacheStoreExt for T {}

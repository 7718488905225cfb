//! In-memory cache store implementation using moka

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache as MokaCache;
use tokio::time::Instant;

use crate::domain::DomainError;
use crate::domain::cache::{CacheStore, DEFAULT_CACHE_ASIDE_TTL, Expiration, ensure_key};

/// Configuration for in-memory cache store
#[derive(Debug, Clone)]
pub struct InMemoryCacheConfig {
    /// Maximum number of entries
    pub max_capacity: u64,
    /// Window used by the cache-aside path
    pub default_ttl: Duration,
}

impl Default for InMemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 100_000,
            default_ttl: DEFAULT_CACHE_ASIDE_TTL,
        }
    }
}

impl InMemoryCacheConfig {
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }
}

/// Longest window an entry may hold; larger requests are clamped so the
/// deadline arithmetic and moka's timer wheel stay in range.
const MAX_ENTRY_WINDOW: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

fn bounded_window(expiration: Expiration) -> Duration {
    expiration.window().min(MAX_ENTRY_WINDOW)
}

/// Cache entry stored in moka
#[derive(Debug)]
struct CacheEntry {
    /// Serialized JSON value
    data: String,
    expiration: Expiration,
    /// Moves forward on reads of sliding entries
    deadline: Mutex<Instant>,
}

impl CacheEntry {
    fn new(data: String, expiration: Expiration) -> Self {
        Self {
            data,
            expiration,
            deadline: Mutex::new(Instant::now() + bounded_window(expiration)),
        }
    }

    fn deadline(&self) -> Instant {
        *self.deadline.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_expired(&self, now: Instant) -> bool {
        now >= self.deadline()
    }

    fn touch(&self, now: Instant) {
        if self.expiration.is_sliding() {
            *self.deadline.lock().unwrap_or_else(PoisonError::into_inner) =
                now + bounded_window(self.expiration);
        }
    }
}

/// Keeps moka's own eviction in step with each entry's policy
struct EntryExpiry;

impl Expiry<String, Arc<CacheEntry>> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Arc<CacheEntry>,
        _created_at: std::time::Instant,
    ) -> Option<Duration> {
        Some(bounded_window(value.expiration))
    }

    fn expire_after_read(
        &self,
        _key: &String,
        value: &Arc<CacheEntry>,
        _read_at: std::time::Instant,
        duration_until_expiry: Option<Duration>,
        _last_modified_at: std::time::Instant,
    ) -> Option<Duration> {
        if value.expiration.is_sliding() {
            Some(bounded_window(value.expiration))
        } else {
            duration_until_expiry
        }
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Arc<CacheEntry>,
        _updated_at: std::time::Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(bounded_window(value.expiration))
    }
}

/// Thread-safe in-memory cache store using moka
///
/// Features:
/// - Absolute or sliding expiration per entry
/// - Capacity-bounded eviction
/// - Concurrent access without external locking
///
/// An entry read at or after its deadline is a miss even if moka has not
/// evicted it yet.
#[derive(Debug)]
pub struct InMemoryCacheStore {
    cache: MokaCache<String, Arc<CacheEntry>>,
    config: InMemoryCacheConfig,
}

impl InMemoryCacheStore {
    /// Creates a new store with default configuration
    pub fn new() -> Self {
        Self::with_config(InMemoryCacheConfig::default())
    }

    /// Creates a new store with the given configuration
    pub fn with_config(config: InMemoryCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(EntryExpiry)
            .build();

        Self { cache, config }
    }

    /// Every moka read pushes a sliding entry's moka expiry forward, so the
    /// entry's own deadline is touched here too and both clocks agree.
    async fn live_entry(&self, key: &str, now: Instant) -> Option<Arc<CacheEntry>> {
        let entry = self.cache.get(key).await?;

        if entry.is_expired(now) {
            return None;
        }

        entry.touch(now);
        Some(entry)
    }
}

impl Default for InMemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn contains(&self, key: &str) -> Result<bool, DomainError> {
        ensure_key(key)?;
        Ok(self.live_entry(key, Instant::now()).await.is_some())
    }

    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        if key.is_empty() {
            return Ok(None);
        }

        Ok(self
            .live_entry(key, Instant::now())
            .await
            .map(|entry| entry.data.clone()))
    }

    async fn set_raw(
        &self,
        key: &str,
        value: &str,
        expiration: Expiration,
    ) -> Result<(), DomainError> {
        ensure_key(key)?;

        let entry = CacheEntry::new(value.to_string(), expiration);
        self.cache.insert(key.to_string(), Arc::new(entry)).await;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.cache.remove(key).await.is_some())
    }

    async fn ttl(&self, key: &str) -> Result<Option<Duration>, DomainError> {
        let now = Instant::now();

        Ok(self
            .live_entry(key, now)
            .await
            .map(|entry| entry.deadline().saturating_duration_since(now)))
    }

    async fn clear(&self) -> Result<(), DomainError> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        Ok(())
    }

    async fn len(&self) -> Result<usize, DomainError> {
        self.cache.run_pending_tasks().await;
        Ok(self.cache.entry_count() as usize)
    }

    fn default_ttl(&self) -> Duration {
        self.config.default_ttl
    }
}

//! Cache domain - Generic caching abstraction layer

mod expiration;
mod key;
mod repository;

pub use expiration::{DEFAULT_CACHE_ASIDE_TTL, Expiration};
pub use key::{entity_key, versioned_entity_key};
pub use repository::{CacheStore, CacheStoreExt, ensure_key};

#[cfg(test)]
pub use repository::mock::MockCacheStore;

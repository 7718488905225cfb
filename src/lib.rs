//! Registry Cache
//!
//! Lazy resolution and background warming of terminology entities fetched
//! from a remote registry service:
//! - A process-wide key/value cache with absolute and sliding expiration
//! - An entity resolution provider that reads through that cache
//! - Periodic warming jobs for concepts and concept sets

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use domain::{CacheStore, FetchError, RemoteClientFactory};
use infrastructure::{
    cache::{InMemoryCacheConfig, InMemoryCacheStore},
    remote::HttpRemoteClientFactory,
    resolution::EntityResolutionProvider,
    warming::{
        CacheWarmingJob, ConceptSetWarmer, ConceptWarmer, Trigger, WarmingOptions,
        WarmingScheduler,
    },
};

/// Shared services built once per process
pub struct Runtime {
    pub config: AppConfig,
    pub cache: Arc<dyn CacheStore>,
    pub factory: Arc<dyn RemoteClientFactory>,
    pub concepts: Arc<CacheWarmingJob<ConceptWarmer>>,
    pub concept_sets: Arc<CacheWarmingJob<ConceptSetWarmer>>,
}

impl Runtime {
    pub fn from_config(config: AppConfig) -> Result<Self, FetchError> {
        let cache: Arc<dyn CacheStore> = Arc::new(InMemoryCacheStore::with_config(
            InMemoryCacheConfig::default()
                .with_max_capacity(config.cache.max_capacity)
                .with_default_ttl(config.cache.default_ttl()),
        ));
        let factory: Arc<dyn RemoteClientFactory> =
            Arc::new(HttpRemoteClientFactory::from_config(&config.remote)?);

        Ok(Self::with_services(config, cache, factory))
    }

    /// Wires the jobs around an existing cache and client factory
    pub fn with_services(
        config: AppConfig,
        cache: Arc<dyn CacheStore>,
        factory: Arc<dyn RemoteClientFactory>,
    ) -> Self {
        let options = WarmingOptions {
            page_size: config.warming.page_size,
            sliding: config.warming.sliding(),
        };

        let concepts = Arc::new(CacheWarmingJob::new(
            ConceptWarmer,
            Arc::clone(&factory),
            Arc::clone(&cache),
            options,
        ));
        let concept_sets = Arc::new(CacheWarmingJob::new(
            ConceptSetWarmer,
            Arc::clone(&factory),
            Arc::clone(&cache),
            options,
        ));

        Self {
            config,
            cache,
            factory,
            concepts,
            concept_sets,
        }
    }

    /// Provider owning a fresh service client
    pub async fn resolver(&self) -> Result<EntityResolutionProvider, FetchError> {
        let client = self.factory.service_client().await?;

        Ok(
            EntityResolutionProvider::new(Arc::clone(&self.cache), client)
                .with_entity_ttl(self.config.cache.entity_ttl()),
        )
    }

    /// Scheduler firing both warming jobs on the configured interval
    pub fn scheduler(&self) -> WarmingScheduler {
        let concepts: Arc<dyn Trigger> = self.concepts.clone();
        let concept_sets: Arc<dyn Trigger> = self.concept_sets.clone();

        WarmingScheduler::new(vec![concepts, concept_sets], self.config.warming.interval())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::remote::{MockRemoteClient, MockRemoteClientFactory};
    use crate::domain::{Bundle, Concept, LazyResolver, ResourceKind};
    use serde_json::json;
    use std::time::Duration;
    use uuid::Uuid;

    fn registry_factory(concept_ids: Vec<Uuid>) -> Arc<dyn RemoteClientFactory> {
        let mut factory = MockRemoteClientFactory::new();
        factory.expect_service_client().returning(move || {
            let ids = concept_ids.clone();
            let mut client = MockRemoteClient::new();
            client.expect_get().times(0);
            client.expect_query().returning(move |kind, _, offset, _| {
                let items = match kind {
                    ResourceKind::Concept => ids
                        .iter()
                        .map(|id| {
                            json!({ "$type": "Concept", "id": id.to_string(), "mnemonic": "Warm" })
                        })
                        .collect(),
                    _ => Vec::new(),
                };
                let total = items.len();
                Ok(Bundle::new(items, offset, total))
            });
            Ok(Box::new(client))
        });
        Arc::new(factory)
    }

    fn runtime(concept_ids: Vec<Uuid>) -> Runtime {
        let config = AppConfig::default();
        let cache: Arc<dyn CacheStore> = Arc::new(InMemoryCacheStore::new());
        Runtime::with_services(config, cache, registry_factory(concept_ids))
    }

    #[tokio::test(start_paused = true)]
    async fn test_warmed_entities_resolve_without_remote_reads() {
        let ids = vec![Uuid::new_v4(), Uuid::new_v4()];
        let runtime = runtime(ids.clone());

        let concepts = runtime.concepts.sweep().await.unwrap();
        let sets = runtime.concept_sets.sweep().await.unwrap();
        assert_eq!(concepts.cached, 2);
        assert_eq!(sets.cached, 0);

        let provider = runtime.resolver().await.unwrap();
        for id in &ids {
            let concept: Option<Concept> = provider.get(Some(*id)).await;
            assert_eq!(concept.unwrap().mnemonic, "Warm");
        }

        let ttl = runtime.cache.ttl(&ids[0].to_string()).await.unwrap();
        assert_eq!(ttl, Some(Duration::from_secs(300)));
    }

    #[tokio::test]
    async fn test_resolver_uses_configured_entity_ttl() {
        let mut config = AppConfig::default();
        config.cache.entity_ttl_secs = 5;
        let cache: Arc<dyn CacheStore> = Arc::new(InMemoryCacheStore::new());
        let runtime = Runtime::with_services(config, cache, registry_factory(Vec::new()));

        let provider = runtime.resolver().await.unwrap();
        assert_eq!(provider.entity_ttl(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduler_fires_both_jobs() {
        let runtime = runtime(vec![Uuid::new_v4()]);
        let handle = runtime.scheduler().start();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(handle.status().ticks, 1);
        assert_eq!(runtime.cache.len().await.unwrap(), 1);

        handle.shutdown().await;
    }
}

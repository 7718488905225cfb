use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::WarmingTarget;
use crate::domain::cache::entity_key;
use crate::domain::remote::fetch_all_pages;
use crate::domain::{CacheStore, CacheStoreExt, FetchError, RemoteClientFactory, Resource};
use crate::infrastructure::metrics::{SweepOutcome, record_sweep, record_warm_items};

/// Tuning for one warming job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarmingOptions {
    /// Items requested per page
    pub page_size: usize,
    /// Sliding window applied to every warmed entry
    pub sliding: Duration,
}

impl Default for WarmingOptions {
    fn default() -> Self {
        Self {
            page_size: 100,
            sliding: Duration::from_secs(300),
        }
    }
}

/// Summary of a completed sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarmingReport {
    pub pages: usize,
    pub items: usize,
    pub cached: usize,
    pub elapsed: Duration,
}

/// Preloads one collection into the cache with sliding expiration
pub struct CacheWarmingJob<W: WarmingTarget> {
    target: W,
    factory: Arc<dyn RemoteClientFactory>,
    cache: Arc<dyn CacheStore>,
    options: WarmingOptions,
}

impl<W: WarmingTarget> CacheWarmingJob<W> {
    pub fn new(
        target: W,
        factory: Arc<dyn RemoteClientFactory>,
        cache: Arc<dyn CacheStore>,
        options: WarmingOptions,
    ) -> Self {
        Self {
            target,
            factory,
            cache,
            options,
        }
    }

    pub fn name(&self) -> &'static str {
        self.target.name()
    }

    /// Runs one full sweep on the current task
    ///
    /// Remote failures abort the sweep. A failed cache write only skips that
    /// item.
    pub async fn sweep(&self) -> Result<WarmingReport, FetchError> {
        let started = Instant::now();
        let kind = <W::Item as Resource>::KIND;

        let client = self.factory.service_client().await?;
        let pages = fetch_all_pages(
            client.as_ref(),
            kind,
            &self.target.filter(),
            self.options.page_size,
        )
        .await?;

        let page_count = pages.len();
        let mut items: Vec<W::Item> = Vec::new();

        for mut page in pages {
            page.reconstitute();
            items.extend(
                page.items_of::<W::Item>()
                    .into_iter()
                    .filter(|item| !item.is_retired()),
            );
        }

        self.target.enrich(client.as_ref(), &mut items).await;

        let mut cached = 0;
        for item in &items {
            let Some(id) = item.key() else {
                tracing::debug!(job = self.name(), "Skipping item without id");
                continue;
            };

            match self
                .cache
                .set_sliding(&entity_key(&id), item, self.options.sliding)
                .await
            {
                Ok(()) => cached += 1,
                Err(e) => {
                    tracing::warn!(job = self.name(), id = %id, error = %e, "Failed to cache warmed item");
                }
            }
        }

        Ok(WarmingReport {
            pages: page_count,
            items: items.len(),
            cached,
            elapsed: started.elapsed(),
        })
    }

    /// Starts a sweep in the background and returns immediately
    ///
    /// The sweep's outcome is only logged and counted. Dropping the handle
    /// does not cancel it.
    pub fn trigger(self: &Arc<Self>) -> JoinHandle<()> {
        let job = Arc::clone(self);

        tokio::spawn(async move {
            job.run_logged().await;
        })
    }

    async fn run_logged(&self) {
        let job = self.name();
        tracing::debug!(job, "Warming sweep started");

        match self.sweep().await {
            Ok(report) => {
                record_sweep(job, SweepOutcome::Completed);
                record_warm_items(job, report.cached);
                tracing::info!(
                    job,
                    pages = report.pages,
                    items = report.items,
                    cached = report.cached,
                    elapsed_ms = report.elapsed.as_millis() as u64,
                    "Warming sweep completed"
                );
            }
            Err(e) if e.is_transient() => {
                record_sweep(job, SweepOutcome::Failed);
                tracing::warn!(job, error = %e, "Warming sweep failed, will retry on next tick");
            }
            Err(e) => {
                record_sweep(job, SweepOutcome::Failed);
                tracing::error!(job, error = %e, "Warming sweep failed");
            }
        }
    }
}

impl<W: WarmingTarget + fmt::Debug> fmt::Debug for CacheWarmingJob<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheWarmingJob")
            .field("target", &self.target)
            .field("cache", &self.cache)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::{Expiration, MockCacheStore};
    use crate::domain::remote::{MockRemoteClient, MockRemoteClientFactory};
    use crate::domain::{
        Bundle, Concept, ConceptSet, OBSOLETE_STATUS_CONCEPT, QueryFilter, RemoteClient,
        ResourceKind,
    };
    use crate::infrastructure::warming::{ConceptSetWarmer, ConceptWarmer};
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    /// Registry stand-in serving a fixed collection
    #[derive(Debug, Clone, Default)]
    struct FakeRegistry {
        items: Arc<Vec<Value>>,
        terms: Arc<HashMap<Uuid, Value>>,
        queries: Arc<AtomicUsize>,
    }

    impl FakeRegistry {
        fn with_items(items: Vec<Value>) -> Self {
            Self {
                items: Arc::new(items),
                ..Default::default()
            }
        }

        fn with_terms(mut self, terms: HashMap<Uuid, Value>) -> Self {
            self.terms = Arc::new(terms);
            self
        }

        fn query_count(&self) -> usize {
            self.queries.load(Ordering::SeqCst)
        }

        fn factory(&self) -> Arc<dyn RemoteClientFactory> {
            let registry = self.clone();
            let mut factory = MockRemoteClientFactory::new();
            factory
                .expect_service_client()
                .returning(move || Ok(Box::new(registry.clone())));
            Arc::new(factory)
        }
    }

    #[async_trait]
    impl RemoteClient for FakeRegistry {
        async fn get(
            &self,
            kind: ResourceKind,
            id: Uuid,
            _version_id: Option<Uuid>,
        ) -> Result<Option<Value>, FetchError> {
            assert_eq!(kind, ResourceKind::ReferenceTerm);
            match self.terms.get(&id) {
                Some(term) => Ok(Some(term.clone())),
                None => Err(FetchError::transport("connection reset")),
            }
        }

        async fn query(
            &self,
            _kind: ResourceKind,
            _filter: &QueryFilter,
            offset: usize,
            count: usize,
        ) -> Result<Bundle, FetchError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            let end = (offset + count).min(self.items.len());
            let page = self.items.get(offset..end).unwrap_or_default().to_vec();
            Ok(Bundle::new(page, offset, self.items.len()))
        }
    }

    fn concepts(n: usize) -> Vec<Value> {
        (0..n)
            .map(|i| {
                json!({
                    "$type": "Concept",
                    "id": Uuid::new_v4().to_string(),
                    "mnemonic": format!("Concept{}", i),
                })
            })
            .collect()
    }

    fn concept_job(
        registry: &FakeRegistry,
        cache: Arc<MockCacheStore>,
    ) -> Arc<CacheWarmingJob<ConceptWarmer>> {
        Arc::new(CacheWarmingJob::new(
            ConceptWarmer,
            registry.factory(),
            cache,
            WarmingOptions::default(),
        ))
    }

    #[tokio::test]
    async fn test_sweep_pages_through_collection() {
        let registry = FakeRegistry::with_items(concepts(250));
        let cache = Arc::new(MockCacheStore::new());
        let job = concept_job(&registry, cache.clone());

        let report = job.sweep().await.unwrap();

        assert_eq!(registry.query_count(), 3);
        assert_eq!(report.pages, 3);
        assert_eq!(report.items, 250);
        assert_eq!(report.cached, 250);
        assert_eq!(cache.keys().len(), 250);
    }

    #[tokio::test]
    async fn test_warmed_entries_use_sliding_expiration() {
        let items = concepts(1);
        let id: Uuid = items[0]["id"].as_str().unwrap().parse().unwrap();
        let registry = FakeRegistry::with_items(items);
        let cache = Arc::new(MockCacheStore::new());

        concept_job(&registry, cache.clone()).sweep().await.unwrap();

        assert_eq!(
            cache.expiration_of(&entity_key(&id)),
            Some(Expiration::Sliding(Duration::from_secs(300)))
        );
    }

    #[tokio::test]
    async fn test_second_sweep_rewrites_same_keys() {
        let registry = FakeRegistry::with_items(concepts(120));
        let cache = Arc::new(MockCacheStore::new());
        let job = concept_job(&registry, cache.clone());

        job.sweep().await.unwrap();
        let first = cache.keys();

        job.sweep().await.unwrap();
        let second = cache.keys();

        assert_eq!(first.len(), 120);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_retired_items_are_not_cached() {
        let live = Uuid::new_v4();
        let registry = FakeRegistry::with_items(vec![
            json!({ "$type": "Concept", "id": live.to_string(), "mnemonic": "Live" }),
            json!({
                "$type": "Concept",
                "id": Uuid::new_v4().to_string(),
                "mnemonic": "Obsoleted",
                "obsoletionTime": "2020-01-01T00:00:00Z",
            }),
            json!({
                "$type": "Concept",
                "id": Uuid::new_v4().to_string(),
                "mnemonic": "Retired",
                "statusConcept": OBSOLETE_STATUS_CONCEPT.to_string(),
            }),
        ]);
        let cache = Arc::new(MockCacheStore::new());

        let report = concept_job(&registry, cache.clone()).sweep().await.unwrap();

        assert_eq!(report.items, 1);
        assert_eq!(cache.keys(), vec![entity_key(&live)]);
    }

    #[tokio::test]
    async fn test_enrich_attaches_terms_and_skips_failures() {
        let concept_id = Uuid::new_v4();
        let known = Uuid::new_v4();
        let missing = Uuid::new_v4();

        let registry = FakeRegistry::with_items(vec![json!({
            "$type": "Concept",
            "id": concept_id.to_string(),
            "mnemonic": "Measles",
            "referenceTerm": [
                { "source": concept_id.to_string(), "term": known.to_string() },
                { "source": concept_id.to_string(), "term": missing.to_string() },
            ],
        })])
        .with_terms(HashMap::from([(
            known,
            json!({ "id": known.to_string(), "mnemonic": "05" }),
        )]));
        let cache = Arc::new(MockCacheStore::new());

        concept_job(&registry, cache.clone()).sweep().await.unwrap();

        let cached: Concept = cache.get(&entity_key(&concept_id)).await.unwrap().unwrap();
        let terms: Vec<Option<&str>> = cached
            .reference_terms
            .iter()
            .map(|link| link.term.as_ref().map(|t| t.mnemonic.as_str()))
            .collect();
        assert_eq!(terms, vec![Some("05"), None]);
    }

    #[tokio::test]
    async fn test_concept_sets_are_queried_for_live_items() {
        let set_id = Uuid::new_v4();
        let mut client = MockRemoteClient::new();
        client
            .expect_query()
            .withf(|kind, filter, offset, count| {
                *kind == ResourceKind::ConceptSet
                    && *filter == QueryFilter::new().is_null("obsoletionTime")
                    && *offset == 0
                    && *count == 100
            })
            .times(1)
            .returning(move |_, _, _, _| {
                Ok(Bundle::new(
                    vec![json!({
                        "$type": "ConceptSet",
                        "id": set_id.to_string(),
                        "mnemonic": "VaccineTypes",
                    })],
                    0,
                    1,
                ))
            });

        let mut factory = MockRemoteClientFactory::new();
        factory
            .expect_service_client()
            .return_once(move || Ok(Box::new(client)));

        let cache = Arc::new(MockCacheStore::new());
        let job = CacheWarmingJob::new(
            ConceptSetWarmer,
            Arc::new(factory),
            cache.clone(),
            WarmingOptions::default(),
        );

        job.sweep().await.unwrap();

        let set: ConceptSet = cache.get(&entity_key(&set_id)).await.unwrap().unwrap();
        assert_eq!(set.mnemonic, "VaccineTypes");
    }

    #[tokio::test]
    async fn test_trigger_swallows_factory_failure() {
        let mut factory = MockRemoteClientFactory::new();
        factory
            .expect_service_client()
            .times(1)
            .returning(|| Err(FetchError::authentication("invalid_client")));

        let cache = Arc::new(MockCacheStore::new());
        let job = Arc::new(CacheWarmingJob::new(
            ConceptWarmer,
            Arc::new(factory),
            cache.clone(),
            WarmingOptions::default(),
        ));

        job.trigger().await.unwrap();

        assert!(cache.keys().is_empty());
    }

    #[tokio::test]
    async fn test_trigger_swallows_query_failure() {
        let mut factory = MockRemoteClientFactory::new();
        factory.expect_service_client().times(2).returning(|| {
            let mut client = MockRemoteClient::new();
            client
                .expect_query()
                .returning(|_, _, _, _| Err(FetchError::transport("connection refused")));
            Ok(Box::new(client))
        });

        let cache = Arc::new(MockCacheStore::new());
        let job = Arc::new(CacheWarmingJob::new(
            ConceptWarmer,
            Arc::new(factory),
            cache.clone(),
            WarmingOptions::default(),
        ));

        job.trigger().await.unwrap();

        assert!(cache.keys().is_empty());
        assert!(matches!(
            job.sweep().await,
            Err(FetchError::Transport { .. })
        ));
    }

    #[tokio::test]
    async fn test_cache_failure_does_not_abort_sweep() {
        let registry = FakeRegistry::with_items(concepts(3));
        let cache = Arc::new(MockCacheStore::new().with_error("store down"));

        let report = concept_job(&registry, cache).sweep().await.unwrap();

        assert_eq!(report.items, 3);
        assert_eq!(report.cached, 0);
    }
}

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::domain::cache::{entity_key, versioned_entity_key};
use crate::domain::remote::fetch_all_pages;
use crate::domain::{
    CacheStore, CacheStoreExt, FetchError, LazyResolver, QueryFilter, RemoteClient, Resource,
    ResourceKind, SimpleAssociation, VersionedAssociation,
};
use crate::infrastructure::metrics::{record_cache_lookup, record_remote_failure};

/// Time a lazily resolved entity stays cached
pub const DEFAULT_ENTITY_TTL: Duration = Duration::from_secs(30);

/// Page size used when a query spans several pages
pub const DEFAULT_QUERY_PAGE_SIZE: usize = 100;

/// Resolves entities on demand, reading through the shared cache
///
/// Point reads are cached for a short absolute window. Relations and queries
/// always go to the remote service.
pub struct EntityResolutionProvider {
    cache: Arc<dyn CacheStore>,
    client: Box<dyn RemoteClient>,
    entity_ttl: Duration,
    page_size: usize,
}

impl EntityResolutionProvider {
    pub fn new(cache: Arc<dyn CacheStore>, client: Box<dyn RemoteClient>) -> Self {
        Self {
            cache,
            client,
            entity_ttl: DEFAULT_ENTITY_TTL,
            page_size: DEFAULT_QUERY_PAGE_SIZE,
        }
    }

    pub fn with_entity_ttl(mut self, ttl: Duration) -> Self {
        self.entity_ttl = ttl;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn entity_ttl(&self) -> Duration {
        self.entity_ttl
    }

    /// Point read through the cache
    ///
    /// A confirmed absence is not cached, so the next read asks again.
    pub async fn try_get<T: Resource>(
        &self,
        id: Uuid,
        version_id: Option<Uuid>,
    ) -> Result<Option<T>, FetchError> {
        let kind = T::KIND;

        if !kind.is_resolvable() {
            return Err(FetchError::NotResolvable(kind));
        }

        let key = match version_id {
            Some(version_id) => versioned_entity_key(&id, &version_id),
            None => entity_key(&id),
        };

        if let Some(cached) = self.cache.try_get_value::<T>(&key).await {
            record_cache_lookup(kind, true);
            tracing::debug!(kind = %kind, key = %key, "Entity cache hit");
            return Ok(Some(cached));
        }

        record_cache_lookup(kind, false);
        tracing::debug!(kind = %kind, key = %key, "Entity cache miss, fetching");

        let Some(value) = self.client.get(kind, id, version_id).await? else {
            return Ok(None);
        };

        let entity: T = serde_json::from_value(value)
            .map_err(|e| FetchError::decode(format!("{} {}: {}", kind, id, e)))?;

        if let Err(e) = self.cache.set(&key, &entity, self.entity_ttl).await {
            tracing::warn!(kind = %kind, key = %key, error = %e, "Failed to cache entity");
        }

        Ok(Some(entity))
    }

    /// Every edge of kind `T` whose source is `source_id`
    pub async fn try_relations<T: SimpleAssociation>(
        &self,
        source_id: Uuid,
    ) -> Result<Vec<T>, FetchError> {
        let filter = QueryFilter::new().eq("source", source_id);

        Ok(self
            .try_query::<T>(&filter)
            .await?
            .into_iter()
            .filter(|edge| edge.source_id() == Some(source_id))
            .collect())
    }

    /// Edges of kind `T` from `source_id` that are active at `sequence`
    pub async fn try_versioned_relations<T: VersionedAssociation>(
        &self,
        source_id: Uuid,
        sequence: i64,
    ) -> Result<Vec<T>, FetchError> {
        Ok(self
            .try_relations::<T>(source_id)
            .await?
            .into_iter()
            .filter(|edge| edge.is_active_at(sequence))
            .collect())
    }

    /// Live search; results are never cached
    pub async fn try_query<T: Resource>(&self, filter: &QueryFilter) -> Result<Vec<T>, FetchError> {
        if !T::KIND.is_resolvable() {
            return Err(FetchError::NotResolvable(T::KIND));
        }

        let pages = fetch_all_pages(self.client.as_ref(), T::KIND, filter, self.page_size).await?;

        Ok(pages
            .into_iter()
            .flat_map(|mut page| {
                page.reconstitute();
                page.items_of::<T>()
            })
            .collect())
    }
}

impl fmt::Debug for EntityResolutionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityResolutionProvider")
            .field("cache", &self.cache)
            .field("entity_ttl", &self.entity_ttl)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

/// Collapses a failed lookup into its fallback value
fn degrade<V>(
    operation: &'static str,
    kind: ResourceKind,
    result: Result<V, FetchError>,
    fallback: V,
) -> V {
    match result {
        Ok(value) => value,
        Err(FetchError::NotResolvable(kind)) => {
            tracing::debug!(kind = %kind, operation, "Kind is not resolvable, skipping");
            fallback
        }
        Err(e) => {
            record_remote_failure(operation);
            tracing::warn!(kind = %kind, operation, error = %e, "Remote lookup failed");
            fallback
        }
    }
}

fn usable(id: Option<Uuid>) -> Option<Uuid> {
    id.filter(|id| !id.is_nil())
}

#[async_trait]
impl LazyResolver for EntityResolutionProvider {
    async fn get<T: Resource>(&self, id: Option<Uuid>) -> Option<T> {
        let id = usable(id)?;
        degrade("get", T::KIND, self.try_get::<T>(id, None).await, None)
    }

    async fn get_version<T: Resource>(
        &self,
        id: Option<Uuid>,
        version_id: Option<Uuid>,
    ) -> Option<T> {
        let id = usable(id)?;
        let version_id = usable(version_id);
        degrade("get", T::KIND, self.try_get::<T>(id, version_id).await, None)
    }

    async fn get_relations<T: SimpleAssociation>(&self, source_id: Option<Uuid>) -> Vec<T> {
        let Some(source_id) = usable(source_id) else {
            return Vec::new();
        };

        degrade(
            "relations",
            T::KIND,
            self.try_relations::<T>(source_id).await,
            Vec::new(),
        )
    }

    async fn get_versioned_relations<T: VersionedAssociation>(
        &self,
        source_id: Option<Uuid>,
        sequence: i64,
    ) -> Vec<T> {
        let Some(source_id) = usable(source_id) else {
            return Vec::new();
        };

        degrade(
            "relations",
            T::KIND,
            self.try_versioned_relations::<T>(source_id, sequence).await,
            Vec::new(),
        )
    }

    async fn query<T: Resource>(&self, filter: &QueryFilter) -> Vec<T> {
        degrade("query", T::KIND, self.try_query::<T>(filter).await, Vec::new())
    }
}

//! Lazy-loading capability consumed by the domain model

use async_trait::async_trait;
use uuid::Uuid;

use super::{Resource, SimpleAssociation, VersionedAssociation};
use crate::domain::remote::QueryFilter;

/// Resolves references that arrive unloaded on a domain object
///
/// Every method degrades to `None` or an empty collection; callers on the
/// request path never see a remote failure.
#[async_trait]
pub trait LazyResolver: Send + Sync {
    /// Entity by id; `None` for a missing id or an unresolvable kind
    async fn get<T: Resource>(&self, id: Option<Uuid>) -> Option<T>;

    /// Entity at a specific version
    async fn get_version<T: Resource>(&self, id: Option<Uuid>, version_id: Option<Uuid>)
    -> Option<T>;

    /// All edges whose source is `source_id`
    async fn get_relations<T: SimpleAssociation>(&self, source_id: Option<Uuid>) -> Vec<T>;

    /// Edges whose source is `source_id` and that are active at `sequence`
    async fn get_versioned_relations<T: VersionedAssociation>(
        &self,
        source_id: Option<Uuid>,
        sequence: i64,
    ) -> Vec<T>;

    /// Live filtered search
    async fn query<T: Resource>(&self, filter: &QueryFilter) -> Vec<T>;
}

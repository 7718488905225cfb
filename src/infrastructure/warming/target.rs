//! What a warming sweep loads and how it finishes each item

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::domain::{
    Concept, ConceptSet, QueryFilter, ReferenceTerm, RemoteClient, Resource, ResourceKind,
};

/// Reference terms fetched at once while enriching concepts
const TERM_FETCH_CONCURRENCY: usize = 8;

/// A collection that is preloaded into the cache
#[async_trait]
pub trait WarmingTarget: Send + Sync + 'static {
    type Item: Resource;

    /// Label used in logs and metrics
    fn name(&self) -> &'static str;

    /// Server-side filter for the sweep; live items only by default
    fn filter(&self) -> QueryFilter {
        QueryFilter::new().is_null("obsoletionTime")
    }

    /// Secondary resolution pass over the collected items
    async fn enrich(&self, _client: &dyn RemoteClient, _items: &mut [Self::Item]) {}
}

/// Preloads live concepts with their reference terms attached
#[derive(Debug, Clone, Copy, Default)]
pub struct ConceptWarmer;

#[async_trait]
impl WarmingTarget for ConceptWarmer {
    type Item = Concept;

    fn name(&self) -> &'static str {
        "concepts"
    }

    async fn enrich(&self, client: &dyn RemoteClient, items: &mut [Concept]) {
        let mut wanted = HashSet::new();
        for concept in items.iter_mut() {
            wanted.extend(
                concept
                    .unresolved_reference_terms()
                    .filter_map(|link| link.term_id),
            );
        }

        if wanted.is_empty() {
            return;
        }

        let fetched: HashMap<Uuid, ReferenceTerm> = stream::iter(wanted)
            .map(|term_id| async move { (term_id, fetch_term(client, term_id).await) })
            .buffer_unordered(TERM_FETCH_CONCURRENCY)
            .filter_map(|(term_id, term)| async move { term.map(|term| (term_id, term)) })
            .collect()
            .await;

        for concept in items.iter_mut() {
            for link in concept.unresolved_reference_terms() {
                if let Some(term) = link.term_id.and_then(|id| fetched.get(&id)) {
                    link.term = Some(term.clone());
                }
            }
        }
    }
}

/// Single reference-term read; failures leave the link unresolved
async fn fetch_term(client: &dyn RemoteClient, term_id: Uuid) -> Option<ReferenceTerm> {
    match client.get(ResourceKind::ReferenceTerm, term_id, None).await {
        Ok(Some(value)) => match serde_json::from_value(value) {
            Ok(term) => Some(term),
            Err(e) => {
                tracing::warn!(term_id = %term_id, error = %e, "Undecodable reference term");
                None
            }
        },
        Ok(None) => {
            tracing::debug!(term_id = %term_id, "Reference term not found");
            None
        }
        Err(e) => {
            tracing::warn!(term_id = %term_id, error = %e, "Failed to load reference term");
            None
        }
    }
}

/// Preloads live concept sets
#[derive(Debug, Clone, Copy, Default)]
pub struct ConceptSetWarmer;

#[async_trait]
impl WarmingTarget for ConceptSetWarmer {
    type Item = ConceptSet;

    fn name(&self) -> &'static str {
        "concept-sets"
    }
}

//! Resource domain - identified entities and the edges between them

mod kind;
mod lazy;

pub use kind::ResourceKind;
pub use lazy::LazyResolver;

use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

/// An entity the registry service can return
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: ResourceKind;

    /// Stable identifier
    fn key(&self) -> Option<Uuid>;

    /// Retired items are skipped when warming the cache
    fn is_retired(&self) -> bool {
        false
    }
}

/// Edge from a source entity to exactly one target
pub trait SimpleAssociation: Resource {
    fn source_id(&self) -> Option<Uuid>;
}

/// Edge that is only valid for a range of the source's version sequences
pub trait VersionedAssociation: SimpleAssociation {
    fn effective_version_sequence(&self) -> Option<i64>;

    fn obsolete_version_sequence(&self) -> Option<i64>;

    /// `effective <= sequence` and, when bounded, `sequence < obsolete`
    ///
    /// A missing effective sequence counts as effective from the start.
    fn is_active_at(&self, sequence: i64) -> bool {
        let effective = self.effective_version_sequence().unwrap_or(0);

        effective <= sequence
            && self
                .obsolete_version_sequence()
                .is_none_or(|obsolete| sequence < obsolete)
    }
}

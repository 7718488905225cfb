use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::resource::{Resource, ResourceKind, SimpleAssociation, VersionedAssociation};

/// Typed edge between two concepts (same-as, narrower-than, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptRelationship {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(rename = "source", default)]
    pub source_id: Option<Uuid>,
    #[serde(rename = "target", default)]
    pub target_id: Option<Uuid>,
    #[serde(rename = "relationshipType", default)]
    pub relationship_type_id: Option<Uuid>,
    #[serde(default)]
    pub effective_version_sequence: Option<i64>,
    #[serde(default)]
    pub obsolete_version_sequence: Option<i64>,
}

impl Resource for ConceptRelationship {
    const KIND: ResourceKind = ResourceKind::ConceptRelationship;

    fn key(&self) -> Option<Uuid> {
        self.id
    }
}

impl SimpleAssociation for ConceptRelationship {
    fn source_id(&self) -> Option<Uuid> {
        self.source_id
    }
}

impl VersionedAssociation for ConceptRelationship {
    fn effective_version_sequence(&self) -> Option<i64> {
        self.effective_version_sequence
    }

    fn obsolete_version_sequence(&self) -> Option<i64> {
        self.obsolete_version_sequence
    }
}

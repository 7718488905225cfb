//! Reference terms and the code systems they belong to

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::resource::{
    LazyResolver, Resource, ResourceKind, SimpleAssociation, VersionedAssociation,
};

/// A code in an external code system (LOINC, ICD-10, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceTerm {
    pub id: Option<Uuid>,
    pub mnemonic: String,
    #[serde(rename = "codeSystem", default)]
    pub code_system_id: Option<Uuid>,
    #[serde(rename = "name", default)]
    pub display_names: Vec<ReferenceTermName>,
}

impl Resource for ReferenceTerm {
    const KIND: ResourceKind = ResourceKind::ReferenceTerm;

    fn key(&self) -> Option<Uuid> {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceTermName {
    pub language: String,
    pub value: String,
}

/// Link from a concept version range to a reference term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptReferenceTerm {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(rename = "source", default)]
    pub source_id: Option<Uuid>,
    #[serde(rename = "term", default)]
    pub term_id: Option<Uuid>,
    #[serde(rename = "termModel", default, skip_serializing_if = "Option::is_none")]
    pub term: Option<ReferenceTerm>,
    #[serde(rename = "relationshipType", default)]
    pub relationship_type_id: Option<Uuid>,
    #[serde(default)]
    pub effective_version_sequence: Option<i64>,
    #[serde(default)]
    pub obsolete_version_sequence: Option<i64>,
}

impl ConceptReferenceTerm {
    /// Resolves the linked term on first access
    pub async fn load_term<R: LazyResolver>(&mut self, resolver: &R) -> Option<&ReferenceTerm> {
        if self.term.is_none() {
            self.term = resolver.get(self.term_id).await;
        }

        self.term.as_ref()
    }
}

impl Resource for ConceptReferenceTerm {
    const KIND: ResourceKind = ResourceKind::ConceptReferenceTerm;

    fn key(&self) -> Option<Uuid> {
        self.id
    }
}

impl SimpleAssociation for ConceptReferenceTerm {
    fn source_id(&self) -> Option<Uuid> {
        self.source_id
    }
}

impl VersionedAssociation for ConceptReferenceTerm {
    fn effective_version_sequence(&self) -> Option<i64> {
        self.effective_version_sequence
    }

    fn obsolete_version_sequence(&self) -> Option<i64> {
        self.obsolete_version_sequence
    }
}

/// An external code system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSystem {
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub oid: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub authority: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

impl Resource for CodeSystem {
    const KIND: ResourceKind = ResourceKind::CodeSystem;

    fn key(&self) -> Option<Uuid> {
        self.id
    }
}

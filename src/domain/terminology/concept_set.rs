//! Concept sets and their membership edges

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::resource::{LazyResolver, Resource, ResourceKind, SimpleAssociation};

/// A named group of concepts, e.g. the values allowed for a form field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptSet {
    pub id: Option<Uuid>,
    pub mnemonic: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub oid: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "concept", default)]
    pub concepts: Vec<Uuid>,
    #[serde(default)]
    pub obsoletion_time: Option<DateTime<Utc>>,
}

impl ConceptSet {
    pub fn new(id: Uuid, mnemonic: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            mnemonic: mnemonic.into(),
            name: None,
            oid: None,
            url: None,
            concepts: Vec::new(),
            obsoletion_time: None,
        }
    }

    /// Loads the membership edges of this set
    pub async fn load_members<R: LazyResolver>(&self, resolver: &R) -> Vec<ConceptSetMember> {
        resolver.get_relations(self.id).await
    }
}

impl Resource for ConceptSet {
    const KIND: ResourceKind = ResourceKind::ConceptSet;

    fn key(&self) -> Option<Uuid> {
        self.id
    }

    fn is_retired(&self) -> bool {
        self.obsoletion_time.is_some()
    }
}

/// Membership of one concept in one set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptSetMember {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(rename = "source", default)]
    pub source_id: Option<Uuid>,
    #[serde(rename = "target", default)]
    pub target_id: Option<Uuid>,
}

impl Resource for ConceptSetMember {
    const KIND: ResourceKind = ResourceKind::ConceptSetMember;

    fn key(&self) -> Option<Uuid> {
        self.id
    }
}

impl SimpleAssociation for ConceptSetMember {
    fn source_id(&self) -> Option<Uuid> {
        self.source_id
    }
}

//! Concepts, their names and classes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ConceptReferenceTerm, ConceptRelationship};
use crate::domain::resource::{LazyResolver, Resource, ResourceKind};

/// Well-known status concept marking a concept as obsolete
pub const OBSOLETE_STATUS_CONCEPT: Uuid = Uuid::from_u128(0xbdfad6a0_6cd4_4a6e_afcb_d8f1a8d4e86b);

/// A controlled-vocabulary concept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    pub id: Option<Uuid>,
    #[serde(rename = "version", default)]
    pub version_id: Option<Uuid>,
    #[serde(rename = "sequence", default)]
    pub version_sequence: Option<i64>,
    pub mnemonic: String,
    #[serde(default)]
    pub is_system_concept: bool,
    #[serde(rename = "statusConcept", default)]
    pub status_concept_id: Option<Uuid>,
    #[serde(rename = "conceptClass", default)]
    pub class_id: Option<Uuid>,
    #[serde(rename = "name", default)]
    pub concept_names: Vec<ConceptName>,
    #[serde(rename = "referenceTerm", default)]
    pub reference_terms: Vec<ConceptReferenceTerm>,
    #[serde(rename = "conceptSet", default)]
    pub concept_sets: Vec<Uuid>,
    #[serde(default)]
    pub obsoletion_time: Option<DateTime<Utc>>,
}

impl Concept {
    pub fn new(id: Uuid, mnemonic: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            version_id: None,
            version_sequence: None,
            mnemonic: mnemonic.into(),
            is_system_concept: false,
            status_concept_id: None,
            class_id: None,
            concept_names: Vec::new(),
            reference_terms: Vec::new(),
            concept_sets: Vec::new(),
            obsoletion_time: None,
        }
    }

    /// Loads the class this concept belongs to
    pub async fn load_class<R: LazyResolver>(&self, resolver: &R) -> Option<ConceptClass> {
        resolver.get(self.class_id).await
    }

    /// Loads the reference-term links valid for this concept's version
    ///
    /// Without a version sequence every link whose source is this concept is
    /// returned.
    pub async fn load_reference_terms<R: LazyResolver>(
        &self,
        resolver: &R,
    ) -> Vec<ConceptReferenceTerm> {
        match self.version_sequence {
            Some(sequence) => resolver.get_versioned_relations(self.id, sequence).await,
            None => resolver.get_relations(self.id).await,
        }
    }

    /// Loads relationships to other concepts valid for this concept's version
    pub async fn load_relationships<R: LazyResolver>(
        &self,
        resolver: &R,
    ) -> Vec<ConceptRelationship> {
        match self.version_sequence {
            Some(sequence) => resolver.get_versioned_relations(self.id, sequence).await,
            None => resolver.get_relations(self.id).await,
        }
    }

    /// Reference-term links that name a term which has not been loaded
    pub fn unresolved_reference_terms(&mut self) -> impl Iterator<Item = &mut ConceptReferenceTerm> {
        self.reference_terms
            .iter_mut()
            .filter(|link| link.term_id.is_some() && link.term.is_none())
    }
}

impl Resource for Concept {
    const KIND: ResourceKind = ResourceKind::Concept;

    fn key(&self) -> Option<Uuid> {
        self.id
    }

    fn is_retired(&self) -> bool {
        self.obsoletion_time.is_some() || self.status_concept_id == Some(OBSOLETE_STATUS_CONCEPT)
    }
}

/// A display name of a concept in one language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptName {
    pub id: Option<Uuid>,
    #[serde(rename = "source", default)]
    pub source_id: Option<Uuid>,
    pub language: String,
    pub value: String,
    #[serde(default)]
    pub phonetic_code: Option<String>,
    #[serde(rename = "phoneticAlgorithm", default)]
    pub phonetic_algorithm_id: Option<Uuid>,
}

impl Resource for ConceptName {
    const KIND: ResourceKind = ResourceKind::ConceptName;

    fn key(&self) -> Option<Uuid> {
        self.id
    }
}

/// Classification of concepts (status, drug, problem, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptClass {
    pub id: Option<Uuid>,
    pub mnemonic: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl Resource for ConceptClass {
    const KIND: ResourceKind = ResourceKind::ConceptClass;

    fn key(&self) -> Option<Uuid> {
        self.id
    }
}

/// Algorithm used to compute phonetic codes of names
///
/// The registry service does not expose this kind; it is never resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneticAlgorithm {
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub handler: Option<String>,
}

impl Resource for PhoneticAlgorithm {
    const KIND: ResourceKind = ResourceKind::PhoneticAlgorithm;

    fn key(&self) -> Option<Uuid> {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_deserialize_wire_format() {
        let value = json!({
            "$type": "Concept",
            "id": "5e1d0c7b-0a4f-4b8a-a7d4-0c4b0f6a0a01",
            "version": "7a2c1c3e-7c0b-4c1e-9a4e-d3c1f0b0e0b2",
            "sequence": 12,
            "mnemonic": "DoseSequence1",
            "statusConcept": "c8064cbd-fa06-4530-b430-1a52f1530c27",
            "name": [{ "language": "en", "value": "Dose 1" }],
            "referenceTerm": [{
                "source": "5e1d0c7b-0a4f-4b8a-a7d4-0c4b0f6a0a01",
                "term": "0f1c8b4e-9a6d-4b6b-8c1e-2a7d5f0e3c11",
                "effectiveVersionSequence": 3
            }]
        });

        let concept: Concept = serde_json::from_value(value).unwrap();

        assert_eq!(concept.mnemonic, "DoseSequence1");
        assert_eq!(concept.version_sequence, Some(12));
        assert_eq!(concept.concept_names.len(), 1);
        assert_eq!(concept.reference_terms.len(), 1);
        assert!(concept.reference_terms[0].term.is_none());
        assert!(!concept.is_retired());
    }

    #[test]
    fn test_retired_by_obsoletion_time() {
        let mut concept = Concept::new(Uuid::new_v4(), "Old");
        concept.obsoletion_time = Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());

        assert!(concept.is_retired());
    }

    #[test]
    fn test_retired_by_status() {
        let mut concept = Concept::new(Uuid::new_v4(), "Old");
        concept.status_concept_id = Some(OBSOLETE_STATUS_CONCEPT);

        assert!(concept.is_retired());
    }

    #[test]
    fn test_obsolete_status_constant() {
        assert_eq!(
            OBSOLETE_STATUS_CONCEPT.to_string(),
            "bdfad6a0-6cd4-4a6e-afcb-d8f1a8d4e86b"
        );
    }
}

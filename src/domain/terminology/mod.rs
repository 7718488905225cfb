//! Terminology domain - concepts, concept sets and reference terms

mod concept;
mod concept_set;
mod reference_term;
mod relationship;

pub use concept::{Concept, ConceptClass, ConceptName, OBSOLETE_STATUS_CONCEPT, PhoneticAlgorithm};
pub use concept_set::{ConceptSet, ConceptSetMember};
pub use reference_term::{CodeSystem, ConceptReferenceTerm, ReferenceTerm, ReferenceTermName};
pub use relationship::ConceptRelationship;

//! Closed set of entity kinds known to the registry service

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Entity kinds the registry service models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Concept,
    ConceptSet,
    ConceptClass,
    ConceptName,
    ConceptReferenceTerm,
    ConceptRelationship,
    ConceptSetMember,
    ReferenceTerm,
    CodeSystem,
    PhoneticAlgorithm,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 10] = [
        ResourceKind::Concept,
        ResourceKind::ConceptSet,
        ResourceKind::ConceptClass,
        ResourceKind::ConceptName,
        ResourceKind::ConceptReferenceTerm,
        ResourceKind::ConceptRelationship,
        ResourceKind::ConceptSetMember,
        ResourceKind::ReferenceTerm,
        ResourceKind::CodeSystem,
        ResourceKind::PhoneticAlgorithm,
    ];

    /// Whether the remote service exposes this kind for point reads and queries
    pub fn is_resolvable(&self) -> bool {
        !matches!(self, ResourceKind::PhoneticAlgorithm)
    }

    /// Wire name, used both as the `$type` discriminator and the URL segment
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Concept => "Concept",
            ResourceKind::ConceptSet => "ConceptSet",
            ResourceKind::ConceptClass => "ConceptClass",
            ResourceKind::ConceptName => "ConceptName",
            ResourceKind::ConceptReferenceTerm => "ConceptReferenceTerm",
            ResourceKind::ConceptRelationship => "ConceptRelationship",
            ResourceKind::ConceptSetMember => "ConceptSetMember",
            ResourceKind::ReferenceTerm => "ReferenceTerm",
            ResourceKind::CodeSystem => "CodeSystem",
            ResourceKind::PhoneticAlgorithm => "PhoneticAlgorithm",
        }
    }

    pub fn resource_path(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();

        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().to_lowercase() == normalized)
            .ok_or_else(|| DomainError::validation(format!("Unknown resource kind: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phonetic_algorithm_is_not_resolvable() {
        assert!(!ResourceKind::PhoneticAlgorithm.is_resolvable());

        let resolvable = ResourceKind::ALL
            .iter()
            .filter(|k| k.is_resolvable())
            .count();
        assert_eq!(resolvable, ResourceKind::ALL.len() - 1);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Concept".parse::<ResourceKind>().unwrap(), ResourceKind::Concept);
        assert_eq!(
            "concept-set".parse::<ResourceKind>().unwrap(),
            ResourceKind::ConceptSet
        );
        assert_eq!(
            "reference_term".parse::<ResourceKind>().unwrap(),
            ResourceKind::ReferenceTerm
        );
        assert!("Patient".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_display_matches_wire_name() {
        assert_eq!(ResourceKind::ConceptSet.to_string(), "ConceptSet");
        assert_eq!(ResourceKind::ReferenceTerm.resource_path(), "ReferenceTerm");
    }
}

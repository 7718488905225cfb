//! Domain layer - Core entities and ports

pub mod cache;
pub mod error;
pub mod remote;
pub mod resource;
pub mod terminology;

pub use cache::{CacheStore, CacheStoreExt, Expiration};
pub use error::DomainError;
pub use remote::{Bundle, FetchError, QueryFilter, RemoteClient, RemoteClientFactory};
pub use resource::{
    LazyResolver, Resource, ResourceKind, SimpleAssociation, VersionedAssociation,
};
pub use terminology::{
    CodeSystem, Concept, ConceptClass, ConceptName, ConceptReferenceTerm, ConceptRelationship,
    ConceptSet, ConceptSetMember, OBSOLETE_STATUS_CONCEPT, PhoneticAlgorithm, ReferenceTerm,
};

//! Lazy entity resolution backed by the registry service

mod provider;

pub use provider::EntityResolutionProvider;

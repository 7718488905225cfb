//! Cache infrastructure - Cache store implementations

mod in_memory;

pub use in_memory::{InMemoryCacheConfig, InMemoryCacheStore};

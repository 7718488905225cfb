//! Ports to the remote registry service

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use super::{Bundle, FetchError, QueryFilter};
use crate::domain::resource::ResourceKind;

#[cfg(test)]
use mockall::automock;

/// Read access to the registry service
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Point read; a missing entity is `Ok(None)`
    async fn get(
        &self,
        kind: ResourceKind,
        id: Uuid,
        version_id: Option<Uuid>,
    ) -> Result<Option<Value>, FetchError>;

    /// One page of a filtered search
    async fn query(
        &self,
        kind: ResourceKind,
        filter: &QueryFilter,
        offset: usize,
        count: usize,
    ) -> Result<Bundle, FetchError>;
}

/// Produces clients authenticated as the service identity, for unattended use
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RemoteClientFactory: Send + Sync {
    async fn service_client(&self) -> Result<Box<dyn RemoteClient>, FetchError>;
}

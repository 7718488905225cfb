use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::remote::{Bundle, FetchError, QueryFilter, RemoteClient};
use crate::domain::resource::ResourceKind;

/// Registry service client over HTTP
#[derive(Debug, Clone)]
pub struct HttpRemoteClient {
    client: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl HttpRemoteClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: None,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn resource_url(&self, kind: ResourceKind) -> String {
        format!("{}/{}", self.base_url, kind.resource_path())
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(reqwest::header::ACCEPT, "application/json");

        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

async fn error_for_status(response: reqwest::Response) -> FetchError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    FetchError::status(status.as_u16(), body)
}

#[async_trait]
impl RemoteClient for HttpRemoteClient {
    async fn get(
        &self,
        kind: ResourceKind,
        id: Uuid,
        version_id: Option<Uuid>,
    ) -> Result<Option<Value>, FetchError> {
        let url = match version_id {
            Some(version) => format!("{}/{}/history/{}", self.resource_url(kind), id, version),
            None => format!("{}/{}", self.resource_url(kind), id),
        };

        let response = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .map_err(|e| FetchError::transport(format!("Request failed: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(error_for_status(response).await);
        }

        response
            .json()
            .await
            .map(Some)
            .map_err(|e| FetchError::decode(format!("Failed to parse {}: {}", kind, e)))
    }

    async fn query(
        &self,
        kind: ResourceKind,
        filter: &QueryFilter,
        offset: usize,
        count: usize,
    ) -> Result<Bundle, FetchError> {
        let mut params = filter.to_query_pairs();
        params.push(("_offset".to_string(), offset.to_string()));
        params.push(("_count".to_string(), count.to_string()));

        let response = self
            .authorized(self.client.get(self.resource_url(kind)))
            .query(&params)
            .send()
            .await
            .map_err(|e| FetchError::transport(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(error_for_status(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| FetchError::decode(format!("Failed to parse {} bundle: {}", kind, e)))
    }
}

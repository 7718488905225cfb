//! Service-identity client factory

use async_trait::async_trait;
use serde::Deserialize;

use super::http_client::HttpRemoteClient;
use crate::config::RemoteConfig;
use crate::domain::remote::{FetchError, RemoteClient, RemoteClientFactory};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Builds clients authenticated with an OAuth2 client-credentials grant
///
/// Background jobs run unattended, so they act as the configured service
/// client rather than as any user.
#[derive(Debug, Clone)]
pub struct HttpRemoteClientFactory {
    client: reqwest::Client,
    base_url: String,
    auth_url: String,
    client_id: String,
    client_secret: String,
}

impl HttpRemoteClientFactory {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        auth_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            auth_url: auth_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn from_config(config: &RemoteConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| FetchError::transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::new(
            client,
            &config.base_url,
            &config.auth_url,
            &config.client_id,
            &config.client_secret,
        ))
    }

    /// Client without credentials, for registries that allow anonymous reads
    pub fn anonymous_client(&self) -> HttpRemoteClient {
        HttpRemoteClient::new(self.client.clone(), &self.base_url)
    }

    async fn request_token(&self) -> Result<String, FetchError> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", "*"),
        ];

        let response = self
            .client
            .post(&self.auth_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| FetchError::transport(format!("Token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::authentication(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| FetchError::authentication(format!("Malformed token response: {}", e)))?;

        Ok(token.access_token)
    }
}

#[async_trait]
impl RemoteClientFactory for HttpRemoteClientFactory {
    async fn service_client(&self) -> Result<Box<dyn RemoteClient>, FetchError> {
        let token = self.request_token().await?;
        tracing::debug!(auth_url = %self.auth_url, "Obtained service identity token");

        Ok(Box::new(self.anonymous_client().with_access_token(token)))
    }
}

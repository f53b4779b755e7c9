//! HTTP client for the push server's key and registration routes.
//!
//! Implements the same [`KeyFetcher`] and [`EndpointRegistrar`] contracts the
//! browser controller uses, so the CLI exercises the server exactly as a page
//! would.

use async_trait::async_trait;
use pushsync_core::constants::{PUBKEY_PATH, REGISTER_PATH};
use pushsync_core::{EndpointRegistrar, KeyFetcher, PublicKey, PushError, RegistrationRequest};
use reqwest::Client;

use crate::constants;

/// API client for the push server.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    server_url: String,
}

impl ApiClient {
    /// Creates a client with the CLI's request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(server_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(constants::HTTP_REQUEST_TIMEOUT)
            .build()?;

        Ok(Self::with_client(client, server_url))
    }

    /// Creates an API client with a pre-configured HTTP client.
    pub fn with_client(client: Client, server_url: impl Into<String>) -> Self {
        Self {
            client,
            server_url: server_url.into(),
        }
    }

    /// Returns the server URL.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.server_url.trim_end_matches('/'), path)
    }
}

#[async_trait(?Send)]
impl KeyFetcher for ApiClient {
    async fn fetch_key(&self) -> pushsync_core::Result<PublicKey> {
        let response = self
            .client
            .get(self.url(PUBKEY_PATH))
            .send()
            .await
            .map_err(|e| PushError::network("GET /pubkey", e))?;

        if !response.status().is_success() {
            return Err(PushError::network("GET /pubkey", response.status()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PushError::network("read /pubkey", e))?;
        Ok(PublicKey::new(body))
    }
}

#[async_trait(?Send)]
impl EndpointRegistrar for ApiClient {
    async fn register(&self, endpoint: &str) -> pushsync_core::Result<()> {
        let request = RegistrationRequest::new(endpoint)?;

        let response = self
            .client
            .post(self.url(REGISTER_PATH))
            .json(&request)
            .send()
            .await
            .map_err(|e| PushError::network("POST /register", e))?;

        if response.status().is_success() {
            log::debug!("[PushSync] Registered {endpoint}");
            Ok(())
        } else {
            Err(PushError::network("POST /register", response.status()))
        }
    }
}

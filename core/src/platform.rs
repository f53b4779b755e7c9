//! Collaborator seams: network, push manager and subscription handles.
//!
//! ```text
//! KeyFetcher ──────────► GET  /pubkey
//! EndpointRegistrar ───► POST /register {"endpoint": ...}
//! PushPlatform ────────► worker readiness / registration, push manager
//!     └── Subscription   (platform-owned handle, one operation at a time)
//! ```
//!
//! Futures are `?Send`: the browser runs everything on one event loop.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{PushError, Result};
use crate::key::PublicKey;

/// Reads the server's current public key.
#[async_trait(?Send)]
pub trait KeyFetcher {
    /// Issue one read for the key. Non-success is a [`PushError::Network`].
    async fn fetch_key(&self) -> Result<PublicKey>;
}

/// Tells the server registry about a delivery endpoint.
#[async_trait(?Send)]
pub trait EndpointRegistrar {
    /// Issue one registration write for `endpoint`.
    async fn register(&self, endpoint: &str) -> Result<()>;
}

/// A platform-owned push registration.
#[async_trait(?Send)]
pub trait Subscription {
    /// URI the push service delivers to.
    fn endpoint(&self) -> String;

    /// Raw key the subscription was created with, if the platform exposes it.
    fn key_material(&self) -> Option<Vec<u8>>;

    /// Release the subscription. Resolves to the platform's success flag.
    async fn unsubscribe(&self) -> Result<bool>;
}

/// The background worker and its push manager.
#[async_trait(?Send)]
pub trait PushPlatform {
    /// Handle type returned by the push manager.
    type Subscription: Subscription;

    /// Wait for the worker to be ready, then read its current subscription.
    async fn current_subscription(&self) -> Result<Option<Self::Subscription>>;

    /// Register `script_url` as the background worker.
    async fn register_worker(&self, script_url: &str) -> Result<()>;

    /// Ask the push manager for a new subscription bound to `key`.
    async fn subscribe(&self, key: &PublicKey) -> Result<Self::Subscription>;
}

/// Body of a registration write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    /// Subscription endpoint URI.
    pub endpoint: String,
}

impl RegistrationRequest {
    /// Build a request, rejecting an empty endpoint.
    pub fn new(endpoint: &str) -> Result<Self> {
        if endpoint.trim().is_empty() {
            return Err(PushError::EmptyEndpoint);
        }
        Ok(Self {
            endpoint: endpoint.to_string(),
        })
    }

    /// JSON body for the write.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| PushError::network("encode registration", e))
    }
}

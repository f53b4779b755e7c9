//! Subcommand implementations. Each returns its result for `main` to print.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use pushsync_core::{keys_match, EndpointRegistrar, KeyFetcher, PublicKey};
use tokio::net::TcpListener;

use crate::api::ApiClient;
use crate::config::Config;
use crate::keys::ServerKey;
use crate::server::{self, ServerState};

/// Generate the server key at the configured path.
pub fn keygen(config: &Config) -> Result<PublicKey> {
    let key = ServerKey::write_new(&config.private_key)?;
    Ok(key.public_key())
}

/// Derive the `/pubkey` body from the configured private key.
pub fn pubkey(config: &Config) -> Result<PublicKey> {
    Ok(ServerKey::load(&config.private_key)?.public_key())
}

/// Outcome of comparing the served key with the local one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCheck {
    /// Key derived from the local private key.
    pub local: PublicKey,
    /// Key the server currently serves.
    pub served: PublicKey,
    /// Whether a browser subscribed with the local key would be kept.
    pub matches: bool,
}

/// Fetch the served key and compare it the way the browser does.
pub async fn check(config: &Config) -> Result<KeyCheck> {
    let key = ServerKey::load(&config.private_key)?;
    let client = ApiClient::new(config.server_url.clone())?;
    let served = client
        .fetch_key()
        .await
        .with_context(|| format!("Fetching public key from {}", client.server_url()))?;

    let matches = keys_match(Some(&key.public_key_bytes()), &served);
    if !matches {
        log::warn!(
            "[PushSync] Served key differs, served='{served}' local='{}'",
            key.public_key()
        );
    }

    Ok(KeyCheck {
        local: key.public_key(),
        served,
        matches,
    })
}

/// Send one registration write for `endpoint`.
pub async fn register(config: &Config, endpoint: &str) -> Result<()> {
    let client = ApiClient::new(config.server_url.clone())?;
    client
        .register(endpoint)
        .await
        .with_context(|| format!("Registering endpoint with {}", client.server_url()))?;
    Ok(())
}

/// Run the push server on `listen` with the configured key and page assets.
pub async fn serve(config: &Config, listen: SocketAddr) -> Result<()> {
    let public_key = ServerKey::load(&config.private_key)?.public_key();
    log::info!("[PushServer] Public key: '{public_key}'");
    if !config.static_dir.is_dir() {
        log::warn!(
            "[PushServer] Static dir {} does not exist, only API routes will answer",
            config.static_dir.display()
        );
    }
    if config.github_client_id.is_none() {
        log::warn!("[PushServer] No GitHub client ID, /auth/start will fail");
    }

    let state = Arc::new(ServerState::new(public_key, config.github_client_id.clone()));
    let listener = TcpListener::bind(listen)
        .await
        .with_context(|| format!("Failed to bind {listen}"))?;
    server::serve(listener, server::router(state, &config.static_dir)).await
}

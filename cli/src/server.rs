//! The push server the browser controller talks to.
//!
//! ```text
//! GET  /pubkey      ──► served key, verbatim
//! POST /register    ──► {"endpoint": ...} recorded per `token` cookie
//! GET  /auth/start  ──► 303 to GitHub OAuth (500 without a client ID)
//! GET  /*           ──► static page assets
//! ```
//!
//! Registrations live in memory only and are lost on restart.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use pushsync_core::constants::{AUTH_START_PATH, PUBKEY_PATH, REGISTER_PATH};
use pushsync_core::{PublicKey, RegistrationRequest};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::services::ServeDir;

use crate::constants::{GITHUB_AUTHORIZE_URL, GITHUB_OAUTH_SCOPE, TOKEN_COOKIE};

/// Endpoints the server has been told about, one per owner.
///
/// The owner is the `token` cookie when the browser sends one, otherwise
/// the endpoint itself.
#[derive(Debug, Default)]
pub struct EndpointRegistry {
    records: Mutex<BTreeMap<String, String>>,
}

impl EndpointRegistry {
    /// Create or replace `owner`'s record. Returns the endpoint it replaced.
    pub async fn record(&self, owner: String, endpoint: String) -> Option<String> {
        self.records.lock().await.insert(owner, endpoint)
    }

    /// Endpoint recorded for `owner`.
    pub async fn get(&self, owner: &str) -> Option<String> {
        self.records.lock().await.get(owner).cloned()
    }

    /// Every recorded endpoint, ordered by owner.
    pub async fn endpoints(&self) -> Vec<String> {
        self.records.lock().await.values().cloned().collect()
    }
}

/// Shared state behind every route.
#[derive(Debug)]
pub struct ServerState {
    public_key: PublicKey,
    github_client_id: Option<String>,
    registry: EndpointRegistry,
}

impl ServerState {
    /// State serving `public_key`. Without a client ID, login is refused.
    pub fn new(public_key: PublicKey, github_client_id: Option<String>) -> Self {
        Self {
            public_key,
            github_client_id,
            registry: EndpointRegistry::default(),
        }
    }

    /// The registrations received so far.
    pub fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }
}

/// Routes for the push server, with `static_dir` as the fallback.
pub fn router(state: Arc<ServerState>, static_dir: &Path) -> Router {
    Router::new()
        .route(PUBKEY_PATH, get(pubkey))
        .route(REGISTER_PATH, post(register))
        .route(AUTH_START_PATH, get(auth_start))
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
}

/// Serve `app` on `listener` until the process exits.
pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    let addr = listener
        .local_addr()
        .context("Failed to read listener address")?;
    log::info!("[PushServer] Listening on http://{addr}");

    axum::serve(listener, app)
        .await
        .context("push server error")
}

async fn pubkey(State(state): State<Arc<ServerState>>) -> String {
    state.public_key.as_str().to_string()
}

async fn register(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // Parsed regardless of Content-Type: plain `fetch` posts arrive as text/plain.
    let request = match serde_json::from_slice::<RegistrationRequest>(&body) {
        Ok(body) => RegistrationRequest::new(&body.endpoint),
        Err(e) => {
            log::warn!("[PushServer] Bad registration body: {e}");
            return (StatusCode::BAD_REQUEST, "Bad request").into_response();
        }
    };
    let request = match request {
        Ok(request) => request,
        Err(e) => {
            log::warn!("[PushServer] Rejected registration: {e}");
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    let token = token_cookie(&headers);
    log::info!(
        "[PushServer] Endpoint: {} (token cookie: {})",
        request.endpoint,
        token.is_some()
    );
    let owner = token.unwrap_or_else(|| request.endpoint.clone());
    if let Some(previous) = state.registry.record(owner, request.endpoint).await {
        log::debug!("[PushServer] Replaced endpoint {previous}");
    }

    StatusCode::OK.into_response()
}

async fn auth_start(State(state): State<Arc<ServerState>>) -> Response {
    let Some(client_id) = state.github_client_id.as_deref() else {
        log::error!("[PushServer] Login requested but no GitHub client ID is configured");
        return (StatusCode::INTERNAL_SERVER_ERROR, "Missing client ID").into_response();
    };

    match authorize_url(client_id) {
        Ok(url) => {
            log::info!("[PushServer] Redirecting to {url}");
            Redirect::to(url.as_str()).into_response()
        }
        Err(e) => {
            log::error!("[PushServer] Building authorize URL failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error").into_response()
        }
    }
}

fn authorize_url(client_id: &str) -> std::result::Result<reqwest::Url, <reqwest::Url as std::str::FromStr>::Err> {
    reqwest::Url::parse_with_params(
        GITHUB_AUTHORIZE_URL,
        &[("client_id", client_id.trim()), ("scope", GITHUB_OAUTH_SCOPE)],
    )
}

/// Value of the `token` cookie, if the request carries one.
fn token_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == TOKEN_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

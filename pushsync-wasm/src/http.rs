//! `fetch`-backed key reads and registration writes.

use async_trait::async_trait;
use js_sys::{Object, Reflect};
use pushsync_core::{EndpointRegistrar, KeyFetcher, PublicKey, PushError, RegistrationRequest, Result};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{RequestInit, Response, Window};

use crate::error::{describe, network_err};

/// Talks to the page's origin server.
#[derive(Debug, Clone)]
pub struct FetchClient {
    window: Window,
    pubkey_path: String,
    register_path: String,
}

impl FetchClient {
    /// Create a client for the given routes.
    pub fn new(window: Window, pubkey_path: &str, register_path: &str) -> Self {
        Self {
            window,
            pubkey_path: pubkey_path.to_string(),
            register_path: register_path.to_string(),
        }
    }
}

/// Await a `fetch` promise and require a 2xx response.
async fn settle(promise: js_sys::Promise, context: &'static str) -> Result<Response> {
    let response: Response = JsFuture::from(promise)
        .await
        .map_err(network_err(context))?
        .dyn_into()
        .map_err(network_err(context))?;

    if !response.ok() {
        return Err(PushError::network(context, response.status()));
    }
    Ok(response)
}

/// JSON POST init. Built as a plain object so only the fields set here exist.
pub fn json_post(body: &str) -> Result<RequestInit> {
    let headers = Object::new();
    let init = Object::new();
    let set = |target: &Object, key: &str, value: &JsValue| {
        Reflect::set(target, &JsValue::from_str(key), value)
            .map(drop)
            .map_err(|e| PushError::network("build request", describe(&e)))
    };
    set(&headers, "Content-Type", &JsValue::from_str("application/json"))?;
    set(&init, "method", &JsValue::from_str("POST"))?;
    set(&init, "headers", &headers)?;
    set(&init, "body", &JsValue::from_str(body))?;
    Ok(init.unchecked_into())
}

#[async_trait(?Send)]
impl KeyFetcher for FetchClient {
    async fn fetch_key(&self) -> Result<PublicKey> {
        let response = settle(self.window.fetch_with_str(&self.pubkey_path), "GET pubkey").await?;
        let text = JsFuture::from(response.text().map_err(network_err("read pubkey"))?)
            .await
            .map_err(network_err("read pubkey"))?;
        let token = text
            .as_string()
            .ok_or_else(|| PushError::network("read pubkey", "body is not text"))?;
        Ok(PublicKey::new(token))
    }
}

#[async_trait(?Send)]
impl EndpointRegistrar for FetchClient {
    async fn register(&self, endpoint: &str) -> Result<()> {
        let body = RegistrationRequest::new(endpoint)?.to_json()?;
        let init = json_post(&body)?;
        settle(
            self.window.fetch_with_str_and_init(&self.register_path, &init),
            "POST register",
        )
        .await?;
        Ok(())
    }
}

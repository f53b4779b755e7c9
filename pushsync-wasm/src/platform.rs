//! Service worker and push manager bindings.

use std::cell::RefCell;

use async_trait::async_trait;
use js_sys::{Object, Reflect, Uint8Array};
use pushsync_core::{PublicKey, PushPlatform, Result, Subscription};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    PushManager, PushSubscription, PushSubscriptionOptionsInit, ServiceWorkerContainer,
    ServiceWorkerRegistration, Window,
};

use crate::error::platform_err;

/// The page's `navigator.serviceWorker` and the push manager behind it.
#[derive(Debug)]
pub struct BrowserPushPlatform {
    container: ServiceWorkerContainer,
    /// Registration returned by the last explicit worker registration.
    registration: RefCell<Option<ServiceWorkerRegistration>>,
}

impl BrowserPushPlatform {
    /// Bind to the window's service worker container.
    pub fn new(window: &Window) -> Self {
        Self {
            container: window.navigator().service_worker(),
            registration: RefCell::new(None),
        }
    }

    /// Wait for an active worker. No timeout.
    async fn ready(&self) -> Result<ServiceWorkerRegistration> {
        let ready = self
            .container
            .ready()
            .map_err(platform_err("serviceWorker.ready"))?;
        JsFuture::from(ready)
            .await
            .map_err(platform_err("serviceWorker.ready"))?
            .dyn_into()
            .map_err(platform_err("serviceWorker.ready"))
    }

    async fn push_manager(&self) -> Result<PushManager> {
        let registered = self.registration.borrow().clone();
        let registration = match registered {
            Some(registration) => registration,
            None => self.ready().await?,
        };
        registration
            .push_manager()
            .map_err(platform_err("registration.pushManager"))
    }
}

#[async_trait(?Send)]
impl PushPlatform for BrowserPushPlatform {
    type Subscription = BrowserSubscription;

    async fn current_subscription(&self) -> Result<Option<BrowserSubscription>> {
        let manager = self.ready().await?.push_manager().map_err(platform_err("registration.pushManager"))?;
        let found = JsFuture::from(
            manager
                .get_subscription()
                .map_err(platform_err("pushManager.getSubscription"))?,
        )
        .await
        .map_err(platform_err("pushManager.getSubscription"))?;

        if found.is_null() || found.is_undefined() {
            return Ok(None);
        }
        let inner: PushSubscription = found
            .dyn_into()
            .map_err(platform_err("pushManager.getSubscription"))?;
        Ok(Some(BrowserSubscription { inner }))
    }

    async fn register_worker(&self, script_url: &str) -> Result<()> {
        let registration: ServiceWorkerRegistration =
            JsFuture::from(self.container.register(script_url))
                .await
                .map_err(platform_err("serviceWorker.register"))?
                .dyn_into()
                .map_err(platform_err("serviceWorker.register"))?;
        self.registration.replace(Some(registration));
        Ok(())
    }

    async fn subscribe(&self, key: &PublicKey) -> Result<BrowserSubscription> {
        let key_bytes = key.to_bytes()?;

        let options = Object::new();
        Reflect::set(&options, &"userVisibleOnly".into(), &JsValue::TRUE)
            .map_err(platform_err("subscribe options"))?;
        Reflect::set(
            &options,
            &"applicationServerKey".into(),
            &Uint8Array::from(key_bytes.as_slice()).into(),
        )
        .map_err(platform_err("subscribe options"))?;
        let options: PushSubscriptionOptionsInit = options.unchecked_into();

        let manager = self.push_manager().await?;
        let inner: PushSubscription = JsFuture::from(
            manager
                .subscribe_with_options(&options)
                .map_err(platform_err("pushManager.subscribe"))?,
        )
        .await
        .map_err(platform_err("pushManager.subscribe"))?
        .dyn_into()
        .map_err(platform_err("pushManager.subscribe"))?;

        Ok(BrowserSubscription { inner })
    }
}

/// A live `PushSubscription`, held for one operation.
#[derive(Debug)]
pub struct BrowserSubscription {
    inner: PushSubscription,
}

#[async_trait(?Send)]
impl Subscription for BrowserSubscription {
    fn endpoint(&self) -> String {
        self.inner.endpoint()
    }

    fn key_material(&self) -> Option<Vec<u8>> {
        self.inner
            .options()
            .application_server_key()
            .ok()
            .flatten()
            .map(|buffer| Uint8Array::new(&buffer).to_vec())
    }

    async fn unsubscribe(&self) -> Result<bool> {
        let released = JsFuture::from(
            self.inner
                .unsubscribe()
                .map_err(platform_err("subscription.unsubscribe"))?,
        )
        .await
        .map_err(platform_err("subscription.unsubscribe"))?;
        Ok(released.as_bool().unwrap_or(false))
    }
}

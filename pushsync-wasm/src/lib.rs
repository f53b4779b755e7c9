//! WebAssembly bindings for the push subscription controller.
//!
//! The page constructs a [`PushController`] around its button and calls
//! `start()` on load; the worker script calls `installPushHandler()`.
//!
//! ```text
//! index.js                                  worker.js
//! ─────────────────────────────────────────────────────────
//! await init()                              await init()
//! c = new PushController(button, config)    installPushHandler()
//! c.attach()
//! await c.start()
//! ```

// Rust guideline compliant 2026-02

use std::cell::RefCell;
use std::rc::Rc;

use pushsync_core::{AuthGate, Controller, ControllerConfig, ReconciliationEngine};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, spawn_local};
use web_sys::{HtmlButtonElement, HtmlDocument, Window};

mod error;
mod http;
mod platform;
mod view;
mod worker;

pub use error::BindingError;
pub use http::{json_post, FetchClient};
pub use platform::{BrowserPushPlatform, BrowserSubscription};
pub use view::ButtonView;
pub use worker::{install_push_handler, payload_text};

use error::describe;

type PageController = Controller<FetchClient, BrowserPushPlatform, FetchClient, ButtonView>;

/// Read a config object from the page. `undefined` and `null` mean defaults.
pub fn parse_config(value: JsValue) -> Result<ControllerConfig, BindingError> {
    if value.is_undefined() || value.is_null() {
        return Ok(ControllerConfig::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| BindingError::Config(e.to_string()))
}

fn auth_gate(window: &Window, config: &ControllerConfig) -> Result<AuthGate, BindingError> {
    if !config.require_auth {
        return Ok(AuthGate::Open);
    }
    let document: HtmlDocument = window
        .document()
        .ok_or_else(|| BindingError::Page("no document".into()))?
        .dyn_into()
        .map_err(|doc| BindingError::Page(format!("not an HTML document: {}", describe(&doc))))?;
    let cookie = document
        .cookie()
        .map_err(|e| BindingError::Page(format!("cookie: {}", describe(&e))))?;
    Ok(AuthGate::from_cookie(&cookie, &config.auth_cookie_marker))
}

/// Push subscription controller bound to one button.
#[wasm_bindgen]
pub struct PushController {
    inner: Rc<PageController>,
    button: HtmlButtonElement,
    listener: RefCell<Option<Closure<dyn FnMut()>>>,
}

#[wasm_bindgen]
impl PushController {
    /// Build a controller. `config` may be omitted for the default routes.
    #[wasm_bindgen(constructor)]
    pub fn new(button: HtmlButtonElement, config: JsValue) -> Result<PushController, JsValue> {
        let config = parse_config(config)?;
        let window = web_sys::window().ok_or_else(|| BindingError::Page("no window".into()))?;
        let gate = auth_gate(&window, &config)?;

        let client = FetchClient::new(window.clone(), &config.pubkey_path, &config.register_path);
        let engine = ReconciliationEngine::new(
            client.clone(),
            BrowserPushPlatform::new(&window),
            client,
        )
        .with_worker_script(config.worker_script.clone());
        let view = ButtonView::new(window, button.clone());

        Ok(PushController {
            inner: Rc::new(Controller::new(engine, view, gate, config.auth_start_path)),
            button,
            listener: RefCell::new(None),
        })
    }

    /// Route the button's clicks to the controller.
    ///
    /// Replaces any listener installed by an earlier call.
    pub fn attach(&self) -> Result<(), JsValue> {
        self.detach()?;

        let controller = Rc::clone(&self.inner);
        let on_click = Closure::<dyn FnMut()>::new(move || {
            let controller = Rc::clone(&controller);
            spawn_local(async move {
                if let Err(e) = controller.click().await {
                    log::error!("[PushSync] {e}");
                }
            });
        });
        self.button
            .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        self.listener.replace(Some(on_click));
        Ok(())
    }

    /// Remove the click listener, if attached.
    pub fn detach(&self) -> Result<(), JsValue> {
        if let Some(previous) = self.listener.take() {
            self.button
                .remove_event_listener_with_callback("click", previous.as_ref().unchecked_ref())?;
        }
        Ok(())
    }

    /// Reconcile on page load. Resolves to the control's label.
    pub fn start(&self) -> js_sys::Promise {
        let controller = Rc::clone(&self.inner);
        future_to_promise(async move {
            controller.start().await.map_err(BindingError::from)?;
            Ok(JsValue::from_str(controller.affordance().label()))
        })
    }

    /// Current label of the control.
    pub fn label(&self) -> String {
        self.inner.affordance().label().to_string()
    }
}

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    // Panic messages and log records go to the devtools console.
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("logger already set: {e}").into());
    }
}

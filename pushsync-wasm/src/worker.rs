//! Background worker side: inbound push messages.
//!
//! Payloads are logged raw. Decrypting or displaying them is not handled here.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{PushEvent, ServiceWorkerGlobalScope};

use crate::error::{describe, BindingError};

/// Text of a push message, empty when it carries no data.
pub fn payload_text(event: &PushEvent) -> String {
    event.data().map(|data| data.text()).unwrap_or_default()
}

/// Register the `push` listener on the worker's global scope.
///
/// Call once from the worker script after the module has loaded. The listener
/// lives as long as the worker.
#[wasm_bindgen(js_name = installPushHandler)]
pub fn install_push_handler() -> Result<(), JsValue> {
    let scope: ServiceWorkerGlobalScope = js_sys::global()
        .dyn_into()
        .map_err(|global| BindingError::Page(format!("not a service worker scope: {}", describe(&global))))?;

    let on_push = Closure::<dyn FnMut(PushEvent)>::new(|event: PushEvent| {
        log::info!("[PushSync] Push received: {}", payload_text(&event));
    });
    scope.add_event_listener_with_callback("push", on_push.as_ref().unchecked_ref())?;
    on_push.forget();

    Ok(())
}

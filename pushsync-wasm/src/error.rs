//! Errors at the JavaScript boundary.

use pushsync_core::PushError;
use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures reported back to the page script.
#[derive(Error, Debug)]
pub enum BindingError {
    /// The reconciliation flow failed.
    #[error(transparent)]
    Push(#[from] PushError),
    /// The config object could not be read.
    #[error("Invalid config: {0}")]
    Config(String),
    /// A required page object (window, document, worker scope) is missing.
    #[error("Page unavailable: {0}")]
    Page(String),
}

impl From<BindingError> for JsValue {
    fn from(err: BindingError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Render a rejected value for logs and error messages.
pub(crate) fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// Map a rejection into a platform error tagged with the failing call.
pub(crate) fn platform_err(context: &'static str) -> impl Fn(JsValue) -> PushError {
    move |value| PushError::platform(context, describe(&value))
}

/// Map a rejection into a network error tagged with the failing call.
pub(crate) fn network_err(context: &'static str) -> impl Fn(JsValue) -> PushError {
    move |value| PushError::network(context, describe(&value))
}

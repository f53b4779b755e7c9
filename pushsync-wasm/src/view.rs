//! The single button the controller drives.

use pushsync_core::{Affordance, ControlView};
use web_sys::{HtmlButtonElement, Window};

use crate::error::describe;

/// Renders affordances onto one `<button>`.
#[derive(Debug, Clone)]
pub struct ButtonView {
    window: Window,
    button: HtmlButtonElement,
}

impl ButtonView {
    /// Wrap a button element.
    pub fn new(window: Window, button: HtmlButtonElement) -> Self {
        Self { window, button }
    }
}

impl ControlView for ButtonView {
    fn render(&self, affordance: Affordance) {
        self.button.set_text_content(Some(affordance.label()));
        self.button.set_disabled(!affordance.is_enabled());
    }

    fn redirect(&self, path: &str) {
        if let Err(e) = self.window.location().set_href(path) {
            log::error!("[PushSync] Redirect to {path} failed: {}", describe(&e));
        }
    }
}

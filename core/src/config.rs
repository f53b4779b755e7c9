//! Page-level controller configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{AUTH_COOKIE_MARKER, AUTH_START_PATH, PUBKEY_PATH, REGISTER_PATH, WORKER_SCRIPT};

/// Settings handed over by the page script. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ControllerConfig {
    /// Route serving the public key.
    pub pubkey_path: String,
    /// Route accepting registration writes.
    pub register_path: String,
    /// Background worker script.
    pub worker_script: String,
    /// Login redirect target.
    pub auth_start_path: String,
    /// Cookie substring marking an authenticated session.
    pub auth_cookie_marker: String,
    /// Replace Subscribe with Login when the cookie marker is absent.
    pub require_auth: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            pubkey_path: PUBKEY_PATH.to_string(),
            register_path: REGISTER_PATH.to_string(),
            worker_script: WORKER_SCRIPT.to_string(),
            auth_start_path: AUTH_START_PATH.to_string(),
            auth_cookie_marker: AUTH_COOKIE_MARKER.to_string(),
            require_auth: false,
        }
    }
}

//! Well-known paths and markers shared by the browser and CLI crates.
//!
//! # Categories
//!
//! - **Server routes**: the two endpoints the controller talks to
//! - **Worker**: the background worker script
//! - **Auth**: the cookie marker and login redirect

// ============================================================================
// Server routes
// ============================================================================

/// Route that serves the current public key as plain text.
pub const PUBKEY_PATH: &str = "/pubkey";

/// Route that accepts `{"endpoint": ...}` registration writes.
pub const REGISTER_PATH: &str = "/register";

// ============================================================================
// Worker
// ============================================================================

/// Script registered as the page's background worker.
pub const WORKER_SCRIPT: &str = "worker.js";

// ============================================================================
// Auth
// ============================================================================

/// Substring of `document.cookie` that marks an authenticated session.
pub const AUTH_COOKIE_MARKER: &str = "token=gho_";

/// Where the Login control sends unauthenticated users.
pub const AUTH_START_PATH: &str = "/auth/start";

//! Application-wide constants for the pushsync CLI.

use std::time::Duration;

// ============================================================================
// Timeouts
// ============================================================================

/// HTTP client request timeout for calls against the push server.
///
/// The browser controller waits indefinitely; the CLI is run by hand and
/// should not hang on an unreachable server.
pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// Defaults
// ============================================================================

/// Server the CLI talks to when none is configured.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// Where `keygen` writes and `pubkey` reads the server's private key.
pub const DEFAULT_PRIVATE_KEY_PATH: &str = "./private.pem";

/// Address `serve` binds when no `--listen` is given.
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

/// Directory `serve` exposes as the page origin (the browser bundle's `www/`).
pub const DEFAULT_STATIC_DIR: &str = "pushsync-wasm/www";

// ============================================================================
// Environment
// ============================================================================

/// Overrides [`DEFAULT_SERVER_URL`].
pub const ENV_SERVER_URL: &str = "PUSHSYNC_SERVER_URL";

/// Overrides [`DEFAULT_PRIVATE_KEY_PATH`].
pub const ENV_PRIVATE_KEY: &str = "PUSHSYNC_PRIVATE_KEY";

/// Overrides [`DEFAULT_STATIC_DIR`].
pub const ENV_STATIC_DIR: &str = "PUSHSYNC_STATIC_DIR";

/// GitHub OAuth app client ID used by `/auth/start`. Unset disables login.
pub const ENV_GITHUB_CLIENT_ID: &str = "PUSHSYNC_GH_CLIENT_ID";

// ============================================================================
// Server
// ============================================================================

/// Cookie that identifies a logged-in user to `/register`.
pub const TOKEN_COOKIE: &str = "token";

/// Where `/auth/start` sends the browser.
pub const GITHUB_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";

/// OAuth scope requested at login.
pub const GITHUB_OAUTH_SCOPE: &str = "notifications";

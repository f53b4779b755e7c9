//! CLI configuration: defaults, then environment, then flags.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_PRIVATE_KEY_PATH, DEFAULT_SERVER_URL, DEFAULT_STATIC_DIR, ENV_GITHUB_CLIENT_ID,
    ENV_PRIVATE_KEY, ENV_SERVER_URL, ENV_STATIC_DIR,
};

/// Resolved settings for one CLI invocation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the push server (`/pubkey`, `/register` live under it).
    pub server_url: String,
    /// PEM file holding the server's private key.
    pub private_key: PathBuf,
    /// Page assets `serve` exposes at `/`.
    pub static_dir: PathBuf,
    /// GitHub OAuth client ID for `/auth/start`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_client_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            private_key: PathBuf::from(DEFAULT_PRIVATE_KEY_PATH),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            github_client_id: None,
        }
    }
}

impl Config {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut config = Self::default();
        if let Some(url) = var(ENV_SERVER_URL) {
            config.server_url = url.trim().to_string();
        }
        if let Some(path) = var(ENV_PRIVATE_KEY) {
            config.private_key = PathBuf::from(path);
        }
        if let Some(dir) = var(ENV_STATIC_DIR) {
            config.static_dir = PathBuf::from(dir);
        }
        config.github_client_id = var(ENV_GITHUB_CLIENT_ID).map(|id| id.trim().to_string());
        config
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, server_url: Option<String>, private_key: Option<PathBuf>) -> Self {
        if let Some(url) = server_url {
            self.server_url = url;
        }
        if let Some(path) = private_key {
            self.private_key = path;
        }
        self
    }

    /// Apply the `serve --static-dir` override.
    pub fn with_static_dir(mut self, static_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = static_dir {
            self.static_dir = dir;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server_url, "http://localhost:8080");
        assert_eq!(config.private_key, PathBuf::from("./private.pem"));
        assert_eq!(config.static_dir, PathBuf::from("pushsync-wasm/www"));
        assert_eq!(config.github_client_id, None);
    }

    #[test]
    fn test_env_overrides_defaults() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("PUSHSYNC_SERVER_URL", " https://push.example.com "),
            ("PUSHSYNC_PRIVATE_KEY", "/etc/pushsync/key.pem"),
            ("PUSHSYNC_STATIC_DIR", "/srv/www"),
            ("PUSHSYNC_GH_CLIENT_ID", " Iv1.abc "),
        ]);
        let config = Config::from_lookup(|name| vars.get(name).map(|v| (*v).to_string()));
        assert_eq!(config.server_url, "https://push.example.com");
        assert_eq!(config.private_key, PathBuf::from("/etc/pushsync/key.pem"));
        assert_eq!(config.static_dir, PathBuf::from("/srv/www"));
        assert_eq!(config.github_client_id.as_deref(), Some("Iv1.abc"));
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let config = Config::from_lookup(|_| Some("  ".to_string()));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_flags_override_env() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("PUSHSYNC_SERVER_URL", "https://env.example.com"),
            ("PUSHSYNC_PRIVATE_KEY", "/env/key.pem"),
            ("PUSHSYNC_STATIC_DIR", "/env/www"),
        ]);
        let config = Config::from_lookup(|name| vars.get(name).map(|v| (*v).to_string()))
            .with_overrides(Some("https://flag.example.com".to_string()), None)
            .with_static_dir(Some(PathBuf::from("/flag/www")));
        assert_eq!(config.server_url, "https://flag.example.com");
        assert_eq!(config.private_key, PathBuf::from("/env/key.pem"));
        assert_eq!(config.static_dir, PathBuf::from("/flag/www"));
    }
}

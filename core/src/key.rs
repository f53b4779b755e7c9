//! Server public key and key comparison.
//!
//! The server distributes its key as URL-safe base64 text; the platform hands
//! back the key a subscription was created with as raw bytes. Comparison always
//! happens in the server's text form, exactly as served, padding included.

use base64::alphabet::URL_SAFE;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD as BASE64};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{PushError, Result};

/// Decoder for the subscribe path: accepts the served key with or without `=`.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Opaque server-issued key token.
///
/// Held verbatim. No code path trims, re-pads or otherwise rewrites it, so the
/// comparator and the subscribe call both derive from the same string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicKey(String);

impl PublicKey {
    /// Wrap a key string as served.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The key exactly as served.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Raw key bytes for the platform's subscribe call.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        URL_SAFE_LENIENT
            .decode(&self.0)
            .map_err(|e| PushError::InvalidKey(format!("{}: {e}", self.0)))
    }
}

impl std::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// URL-safe text form of raw key material.
///
/// Standard base64 with `/` and `+` swapped for `_` and `-`. Padding is kept.
pub fn url_safe_encoding(key_material: &[u8]) -> String {
    BASE64
        .encode(key_material)
        .replace('/', "_")
        .replace('+', "-")
}

/// Whether a subscription's key material was created with `public_key`.
///
/// Missing key material never matches: such a subscription cannot be proven
/// current and is treated as stale.
pub fn keys_match(key_material: Option<&[u8]>, public_key: &PublicKey) -> bool {
    key_material.is_some_and(|bytes| url_safe_encoding(bytes) == public_key.as_str())
}

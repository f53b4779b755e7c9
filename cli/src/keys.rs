//! Server key pair for push subscriptions.
//!
//! P-256 key, private half stored as SEC1 PEM (`EC PRIVATE KEY`). The public
//! half is served as the uncompressed SEC1 point (65 bytes) in padded URL-safe
//! base64: the exact string browsers compare their subscription key against.

// Rust guideline compliant 2026-02

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::URL_SAFE as BASE64URL, Engine};
use p256::ecdsa::SigningKey;
use p256::elliptic_curve::rand_core::OsRng;
use p256::pkcs8::{DecodePrivateKey, LineEnding};
use p256::SecretKey;
use pushsync_core::PublicKey;

/// The server's P-256 key.
pub struct ServerKey {
    signing_key: SigningKey,
}

impl std::fmt::Debug for ServerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerKey")
            .field("public_key", &self.public_key().as_str())
            .finish_non_exhaustive()
    }
}

impl ServerKey {
    /// Generate a fresh key.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut OsRng),
        }
    }

    /// Parse a PEM private key. SEC1 is expected; PKCS8 is accepted too.
    pub fn from_pem(pem: &str) -> Result<Self> {
        let secret = if let Ok(secret) = SecretKey::from_sec1_pem(pem) {
            secret
        } else {
            SecretKey::from_pkcs8_pem(pem)
                .context("Private key is neither SEC1 nor PKCS8 PEM for P-256")?
        };
        Ok(Self {
            signing_key: SigningKey::from(secret),
        })
    }

    /// SEC1 PEM encoding of the private key.
    pub fn to_pem(&self) -> Result<String> {
        let secret = SecretKey::from(self.signing_key.clone());
        let pem = secret
            .to_sec1_pem(LineEnding::LF)
            .context("Encoding private key as SEC1 PEM")?;
        Ok((*pem).clone())
    }

    /// Read a PEM private key from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let pem = std::fs::read_to_string(path)
            .with_context(|| format!("Reading private key {}", path.display()))?;
        Self::from_pem(&pem).with_context(|| format!("Parsing private key {}", path.display()))
    }

    /// Generate a key and write it to `path`. Never overwrites an existing file.
    pub fn write_new(path: &Path) -> Result<Self> {
        anyhow::ensure!(
            !path.exists(),
            "Private key already exists: {}",
            path.display()
        );

        let key = Self::generate();
        let pem = key.to_pem()?;

        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options
            .open(path)
            .with_context(|| format!("Creating {}", path.display()))?;
        file.write_all(pem.as_bytes())
            .with_context(|| format!("Writing {}", path.display()))?;

        log::info!("[PushSync] Wrote private key to {}", path.display());
        Ok(key)
    }

    /// Uncompressed public point (65 bytes: `0x04 || x || y`).
    pub fn public_key_bytes(&self) -> Vec<u8> {
        self.signing_key
            .verifying_key()
            .to_encoded_point(false)
            .as_bytes()
            .to_vec()
    }

    /// The key as `/pubkey` serves it.
    pub fn public_key(&self) -> PublicKey {
        PublicKey::new(BASE64URL.encode(self.public_key_bytes()))
    }
}
